//! Record layouts of the ISOTXS format, see the CCCC-IV definition

// internal modules
use cccc_record::{Layout, Metadata, Result};

/// Dimensions from the file control record
#[derive(Debug, Clone, Copy)]
pub(crate) struct FileControl {
    pub ngroup: usize,
    pub niso: usize,
    pub ichist: usize,
    pub nscmax: usize,
    pub nsblok: i32,
}

impl FileControl {
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            ngroup: metadata.count("NGROUP")?,
            niso: metadata.count("NISO")?,
            ichist: metadata.count("ICHIST")?,
            nscmax: metadata.count("NSCMAX")?,
            nsblok: metadata.require_int("NSBLOK")?,
        })
    }
}

/// Dimensions and flags from a nuclide control record
#[derive(Debug, Clone, Copy)]
pub(crate) struct NuclideControl {
    pub ichi: usize,
    pub ifis: usize,
    pub ialf: usize,
    pub inp: usize,
    pub in2n: usize,
    pub ind: usize,
    pub int: usize,
    pub ltot: usize,
    pub ltrn: usize,
    pub istrpd: usize,
}

impl NuclideControl {
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            ichi: metadata.count("ICHI")?,
            ifis: metadata.count("IFIS")?,
            ialf: metadata.count("IALF")?,
            inp: metadata.count("INP")?,
            in2n: metadata.count("IN2N")?,
            ind: metadata.count("IND")?,
            int: metadata.count("INT")?,
            ltot: metadata.count("LTOT")?,
            ltrn: metadata.count("LTRN")?,
            istrpd: metadata.count("ISTRPD")?,
        })
    }
}

pub(crate) const FILE_CONTROL: [&str; 8] = [
    "NGROUP", "NISO", "MAXUP", "MAXDN", "MAXORD", "ICHIST", "NSCMAX", "NSBLOK",
];

pub(crate) const NUCLIDE_CONTROL: [&str; 17] = [
    "AMASS", "EFISS", "ECAPT", "TEMP", "SIGPOT", "ADENS", "KBR", "ICHI", "IFIS", "IALF", "INP",
    "IN2N", "IND", "INT", "LTOT", "LTRN", "ISTRPD",
];

pub(crate) fn file_control() -> Layout {
    Layout::new().implicit(&FILE_CONTROL)
}

pub(crate) fn file_data(c: &FileControl) -> Layout {
    let layout = Layout::new()
        .strings("HSETID", 12, 8)
        .strings("HISONM", c.niso, 8);
    let layout = match c.ichist {
        1 => layout.floats("CHI", &[c.ngroup]),
        _ => layout,
    };
    layout
        .floats("VEL", &[c.ngroup])
        .floats("EMAX", &[c.ngroup])
        .float("EMIN")
        .ints("LOCA", &[c.niso])
}

pub(crate) fn file_chi(c: &FileControl) -> Layout {
    Layout::new()
        .floats("FSSPEC", &[c.ichist, c.ngroup])
        .ints("ISSPEC", &[c.ngroup])
}

pub(crate) fn nuclide_control(c: &FileControl) -> Layout {
    Layout::new()
        .string("HABSID", 8)
        .string("HIDENT", 8)
        .string("HMAT", 8)
        .implicit(&NUCLIDE_CONTROL)
        .ints("IDSCT", &[c.nscmax])
        .ints("LORD", &[c.nscmax])
        .ints("JBAND", &[c.nscmax, c.ngroup])
        .ints("IJJ", &[c.nscmax, c.ngroup])
}

pub(crate) fn principal(c: &FileControl, n: &NuclideControl) -> Layout {
    let g = c.ngroup;
    let mut layout = Layout::new()
        .floats("STRPL", &[n.ltrn, g])
        .floats("STOTPL", &[n.ltot, g])
        .floats("SNGAM", &[g]);

    if n.ifis > 0 {
        layout = layout.floats("SFIS", &[g]).floats("SNUTOT", &[g]);
    }
    if n.ichi == 1 {
        layout = layout.floats("CHISO", &[g]);
    }

    let optional = [
        ("SNALF", n.ialf),
        ("SNP", n.inp),
        ("SN2N", n.in2n),
        ("SND", n.ind),
        ("SNT", n.int),
    ];
    for (name, flag) in optional {
        if flag > 0 {
            layout = layout.floats(name, &[g]);
        }
    }

    layout.floats("STRPD", &[n.istrpd, g])
}

pub(crate) fn nuclide_chi(c: &FileControl, n: &NuclideControl) -> Layout {
    Layout::new()
        .floats("CHIISO", &[n.ichi, c.ngroup])
        .ints("ISOPEC", &[c.ngroup])
}

pub(crate) fn scattering(orders: usize, kmax: usize) -> Layout {
    Layout::new().floats("SCAT", &[orders, kmax])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccc_record::Kind;

    #[test]
    fn control_typing() {
        let layout = file_control();
        assert!(layout.fields().iter().all(|f| f.kind == Kind::Int));

        let c = FileControl {
            ngroup: 4,
            niso: 2,
            ichist: 0,
            nscmax: 3,
            nsblok: 1,
        };
        let layout = nuclide_control(&c);
        let kinds = layout
            .fields()
            .iter()
            .map(|f| (f.name.as_str(), f.kind))
            .collect::<Vec<_>>();
        assert!(kinds.contains(&("AMASS", Kind::Float)));
        assert!(kinds.contains(&("KBR", Kind::Int)));
        assert!(kinds.contains(&("SIGPOT", Kind::Float)));
        assert!(kinds.contains(&("ISTRPD", Kind::Int)));
        // 3 x A8, 6 floats, 11 ints, 2 x NSCMAX and 2 x NSCMAX x NGROUP ints
        assert_eq!(layout.byte_length(), 24 + 4 * (6 + 11 + 6 + 24));
    }

    #[test]
    fn conditional_principal_fields() {
        let c = FileControl {
            ngroup: 2,
            niso: 1,
            ichist: 0,
            nscmax: 1,
            nsblok: 1,
        };
        let mut n = NuclideControl {
            ichi: 0,
            ifis: 0,
            ialf: 0,
            inp: 0,
            in2n: 0,
            ind: 0,
            int: 0,
            ltot: 1,
            ltrn: 1,
            istrpd: 0,
        };
        let names = |layout: Layout| {
            layout
                .fields()
                .iter()
                .map(|f| f.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(
            names(principal(&c, &n)),
            ["STRPL", "STOTPL", "SNGAM", "STRPD"]
        );

        n.ifis = 1;
        n.ichi = 1;
        n.in2n = 1;
        assert_eq!(
            names(principal(&c, &n)),
            ["STRPL", "STOTPL", "SNGAM", "SFIS", "SNUTOT", "CHISO", "SN2N", "STRPD"]
        );
    }
}
