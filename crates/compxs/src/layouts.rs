//! Record layouts of the COMPXS format, see the CCCC-IV definition

// internal modules
use cccc_record::{Layout, Metadata, Result};

/// Dimensions from the specifications record
#[derive(Debug, Clone, Copy)]
pub(crate) struct Specifications {
    pub ncmp: usize,
    pub ngroup: usize,
    pub ichi: usize,
    pub nfam: usize,
}

impl Specifications {
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            ncmp: metadata.count("NCMP")?,
            ngroup: metadata.count("NGROUP")?,
            ichi: metadata.count("ICHI")?,
            nfam: metadata.count("NFAM")?,
        })
    }
}

/// Flags and sizes of one composition
#[derive(Debug, Clone, Copy)]
pub(crate) struct CompositionControl {
    pub ichi: usize,
    pub ifis: usize,
    pub nkfam: usize,
}

impl CompositionControl {
    pub fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Ok(Self {
            ichi: metadata.count("ICHI")?,
            ifis: metadata.count("IFIS")?,
            nkfam: metadata.require_ints("NUMFAM")?.len(),
        })
    }
}

pub(crate) const SPECIFICATIONS: [&str; 9] = [
    "NCMP", "NGROUP", "ICHI", "NFAM", "MAXUP", "MAXDN", "NDUM1", "NDUM2", "NDUM3",
];

/// Scalars of every group record, before and after the scattering band
pub(crate) const GROUP_LEADING: [&str; 4] = ["XA", "XTOT", "XREM", "XTR"];
pub(crate) const GROUP_TRAILING: [&str; 3] = ["D1", "D2", "D3"];

pub(crate) fn specifications() -> Layout {
    Layout::new().implicit(&SPECIFICATIONS)
}

pub(crate) fn independent(s: &Specifications) -> Layout {
    let g = s.ngroup;
    let layout = match s.ichi {
        0 => Layout::new(),
        1 => Layout::new().floats("CHI", &[g]),
        _ => Layout::new()
            .floats("CHI", &[s.ichi, g])
            .ints("ISSPEC", &[g]),
    };
    layout
        .floats("VEL", &[g])
        .floats("EMAX", &[g])
        .float("EMIN")
        .ints("NKFAM", &[s.ncmp])
        .floats("CHID", &[s.nfam, g])
        .floats("FLAM", &[s.nfam])
}

/// Leading fields of the composition specifications
pub(crate) fn composition(s: &Specifications) -> Layout {
    let g = s.ngroup;
    Layout::new()
        .implicit(&["ICHI", "IFIS"])
        .ints("NUP", &[g])
        .ints("NDN", &[g])
}

/// Remaining composition specifications of a composition with `nkfam` families
///
/// `ISSPEC` is only present for a composition with its own chi matrix, as
/// given by the `ICHI` of the leading fields.
pub(crate) fn composition_tail(
    s: &Specifications,
    nkfam: usize,
    metadata: &Metadata,
) -> Result<Layout> {
    let layout = match metadata.count("ICHI")? {
        0 | 1 => Layout::new(),
        _ => Layout::new().ints("ISSPEC", &[s.ngroup]),
    };
    Ok(layout.ints("NUMFAM", &[nkfam]))
}

/// Cross sections of one group, `width` values of scattering band
pub(crate) fn group(c: &CompositionControl, width: usize) -> Layout {
    let mut layout = Layout::new().implicit(&GROUP_LEADING);
    if c.ifis > 0 {
        layout = layout.float("XFIS").float("XNUF");
    }
    layout = match c.ichi {
        0 => layout,
        1 => layout.float("CHI"),
        n => layout.floats("CHI", &[n]),
    };
    layout = layout
        .floats("XSCAT", &[width])
        .implicit(&GROUP_TRAILING);
    match c.ifis {
        0 => layout,
        _ => layout.floats("XNUD", &[c.nkfam]),
    }
}

pub(crate) fn power(s: &Specifications) -> Layout {
    Layout::new()
        .floats("FPS", &[s.ncmp])
        .floats("CPS", &[s.ncmp])
}

#[cfg(test)]
mod tests {
    use super::*;
    use cccc_record::Kind;
    use rstest::rstest;

    fn names(layout: &Layout) -> Vec<&str> {
        layout.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn specifications_are_ints() {
        let layout = specifications();
        assert!(layout.fields().iter().all(|f| f.kind == Kind::Int));
        assert_eq!(layout.byte_length(), 36);
    }

    #[test]
    fn group_fields_follow_flags() {
        let mut c = CompositionControl {
            ichi: 0,
            ifis: 0,
            nkfam: 2,
        };
        assert_eq!(
            names(&group(&c, 3)),
            ["XA", "XTOT", "XREM", "XTR", "XSCAT", "D1", "D2", "D3"]
        );
        assert_eq!(group(&c, 3).byte_length(), 4 * (7 + 3));

        c.ifis = 1;
        c.ichi = 1;
        assert_eq!(
            names(&group(&c, 1)),
            ["XA", "XTOT", "XREM", "XTR", "XFIS", "XNUF", "CHI", "XSCAT", "D1", "D2", "D3", "XNUD"]
        );
        assert!(group(&c, 1).fields().iter().all(|f| f.kind == Kind::Float));
        assert_eq!(group(&c, 1).byte_length(), 4 * (10 + 1 + 2));
    }

    #[test]
    fn chi_matrix_adds_spectrum_indices() {
        let s = Specifications {
            ncmp: 2,
            ngroup: 4,
            ichi: 2,
            nfam: 1,
        };
        assert_eq!(
            names(&independent(&s)),
            ["CHI", "ISSPEC", "VEL", "EMAX", "EMIN", "NKFAM", "CHID", "FLAM"]
        );
        assert_eq!(names(&composition(&s)), ["ICHI", "IFIS", "NUP", "NDN"]);
    }

    #[rstest]
    #[case(0, 0, &["NUMFAM"])]
    #[case(2, 1, &["NUMFAM"])]
    #[case(0, 3, &["ISSPEC", "NUMFAM"])]
    #[case(2, 2, &["ISSPEC", "NUMFAM"])]
    fn spectrum_indices_follow_composition(
        #[case] file: usize,
        #[case] region: i32,
        #[case] expected: &[&str],
    ) {
        let s = Specifications {
            ncmp: 1,
            ngroup: 4,
            ichi: file,
            nfam: 0,
        };
        let mut metadata = Metadata::new();
        metadata.insert("ICHI", region);
        let tail = composition_tail(&s, 0, &metadata).unwrap();
        assert_eq!(names(&tail), expected);

        metadata.insert("ICHI", -1);
        assert!(composition_tail(&s, 0, &metadata).is_err());
    }
}
