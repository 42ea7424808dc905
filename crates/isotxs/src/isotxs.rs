// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// internal modules
use cccc_record::{Format, Metadata, Stream};
use cccc_utils::{f, ValueExt};

// crate modules
use crate::error::{Error, Result};
use crate::layouts::{self, FileControl};
use crate::nuclide::Nuclide;

// external crates
use log::{info, warn};
use serde::Serialize;

/// Data structure for the contents of an ISOTXS file
///
/// The file-wide `metadata` holds the fields of the file identification,
/// file control, file data and file-wide chi records. Every nuclide keeps its
/// own records, see [Nuclide].
///
/// Values that describe the library as a whole (`NISO`, `HISONM`, `LOCA`,
/// `MAXUP`, `MAXDN`, `MAXORD`) are written exactly as they are held. Call
/// [Isotxs::refresh] after modifying the nuclides to bring them up to date.
///
/// ```rust
/// # use cccc_isotxs::{Isotxs, Nuclide};
/// let mut library = Isotxs::new(33, 1);
/// library.add_nuclide(Nuclide::new("U235", 33, 1)).unwrap();
/// library.add_nuclide(Nuclide::new("U238", 33, 1)).unwrap();
///
/// assert_eq!(library.metadata.int("NISO"), Some(2));
/// assert!(library.get_nuclide("U238").is_some());
/// assert!(library.add_nuclide(Nuclide::new("U235", 33, 1)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Isotxs {
    /// File-wide values
    pub metadata: Metadata,
    /// Nuclides in file order
    pub nuclides: Vec<Nuclide>,
}

impl Isotxs {
    /// Empty library of `ngroup` groups and `nscmax` scattering blocks
    pub fn new(ngroup: usize, nscmax: usize) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("HNAME", Self::NAME);
        metadata.insert("HUSE1", "");
        metadata.insert("HUSE2", "");
        metadata.insert("IVERS", 1);

        for name in layouts::FILE_CONTROL {
            metadata.insert(name, 0);
        }
        metadata.insert("NGROUP", ngroup as i32);
        metadata.insert("NSCMAX", nscmax as i32);
        metadata.insert("NSBLOK", 1);

        metadata.insert("HSETID", vec![String::new(); 12]);
        metadata.insert("VEL", vec![0.0_f32; ngroup]);
        metadata.insert("EMAX", vec![0.0_f32; ngroup]);
        metadata.insert("EMIN", 0.0_f32);

        let mut library = Self {
            metadata,
            nuclides: Vec::new(),
        };
        library.refresh();
        library
    }

    /// Number of energy groups
    pub fn num_groups(&self) -> Option<usize> {
        self.metadata.count("NGROUP").ok()
    }

    /// Labels of every nuclide in file order
    pub fn labels(&self) -> Vec<&str> {
        self.nuclides.iter().map(|n| n.label.as_str()).collect()
    }

    /// Find a nuclide by its `HISONM` label
    pub fn get_nuclide(&self, label: &str) -> Option<&Nuclide> {
        self.nuclides.iter().find(|n| n.label == label)
    }

    pub fn get_nuclide_mut(&mut self, label: &str) -> Option<&mut Nuclide> {
        self.nuclides.iter_mut().find(|n| n.label == label)
    }

    /// Append a nuclide, failing for a duplicate label or mismatched shapes
    pub fn add_nuclide(&mut self, nuclide: Nuclide) -> Result<()> {
        if self.get_nuclide(&nuclide.label).is_some() {
            return Err(Error::DuplicateNuclide(nuclide.label));
        }
        if nuclide.num_groups() != self.num_groups() {
            return Err(Error::Incompatible {
                field: "NGROUP".to_string(),
            });
        }
        if nuclide.num_blocks() != self.metadata.count("NSCMAX").ok() {
            return Err(Error::Incompatible {
                field: "NSCMAX".to_string(),
            });
        }
        self.nuclides.push(nuclide);
        self.refresh();
        Ok(())
    }

    /// Recompute the values derived from the nuclides
    ///
    /// Sets `NISO`, `HISONM` and `LOCA`, and the largest upscatter,
    /// downscatter and Legendre order over all present scattering blocks.
    pub fn refresh(&mut self) {
        let mut loca = Vec::with_capacity(self.nuclides.len());
        let mut position = 0;
        let (mut maxup, mut maxdn, mut maxord) = (0, 0, 0);

        for nuclide in &self.nuclides {
            loca.push(position as i32);
            position += nuclide.num_records().unwrap_or(2);

            for n in nuclide.scatter.keys() {
                if let Ok(widths) = nuclide.band_widths(*n) {
                    maxup = maxup.max(widths.max_up());
                    maxdn = maxdn.max(widths.max_down());
                }
            }
            maxord = maxord.max(nuclide.max_order());
        }

        let labels = self
            .nuclides
            .iter()
            .map(|n| n.label.clone())
            .collect::<Vec<_>>();

        self.metadata.insert("NISO", labels.len() as i32);
        self.metadata.insert("HISONM", labels);
        self.metadata.insert("LOCA", loca);
        self.metadata.insert("MAXUP", maxup as i32);
        self.metadata.insert("MAXDN", maxdn as i32);
        self.metadata.insert("MAXORD", maxord as i32);
    }

    /// Combine two libraries into a new one
    ///
    /// Nuclides of `other` are appended after those of `self`, and the group
    /// structure, block count and file-wide chi must agree. Energy bounds that
    /// differ are only warned about, the values of `self` are kept.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        for field in ["NGROUP", "NSCMAX", "ICHIST"] {
            if self.metadata.int(field) != other.metadata.int(field) {
                return Err(Error::Incompatible {
                    field: field.to_string(),
                });
            }
        }
        for field in ["CHI", "FSSPEC", "ISSPEC"] {
            if self.metadata.get(field) != other.metadata.get(field) {
                return Err(Error::Incompatible {
                    field: field.to_string(),
                });
            }
        }
        if self.metadata.get("EMAX") != other.metadata.get("EMAX")
            || self.metadata.get("EMIN") != other.metadata.get("EMIN")
        {
            warn!("Merging ISOTXS libraries with different group boundaries");
        }

        let mut merged = self.clone();
        for nuclide in &other.nuclides {
            if merged.get_nuclide(&nuclide.label).is_some() {
                return Err(Error::DuplicateNuclide(nuclide.label.clone()));
            }
            merged.nuclides.push(nuclide.clone());
        }
        merged.refresh();
        Ok(merged)
    }

    /// Write the library as pretty printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Writing {path:?}");
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Nuclides for the labels listed in `HISONM`
    fn nuclides_from_labels(&mut self, stream: &Stream) -> Result<()> {
        let labels = self
            .metadata
            .require_strings("HISONM")
            .map_err(|e| stream.structural(e))?;
        self.nuclides = labels.iter().map(|l| Nuclide::with_label(l)).collect();
        Ok(())
    }

    /// Writing requires the nuclides to be those listed in `HISONM`
    fn check_labels(&self, stream: &Stream) -> Result<()> {
        let listed = self.metadata.strings("HISONM").unwrap_or_default();
        if listed.iter().map(String::as_str).ne(self.labels()) {
            return Err(stream
                .structural(f!(
                    "HISONM lists {listed:?} but the nuclides are {:?}, see Isotxs::refresh()",
                    self.labels()
                ))
                .into());
        }
        Ok(())
    }
}

impl Format for Isotxs {
    const NAME: &'static str = "ISOTXS";
    type Error = Error;

    fn read_write(&mut self, stream: &mut Stream) -> Result<()> {
        stream.identification(&mut self.metadata)?;
        stream.record("file control", &layouts::file_control(), &mut self.metadata)?;

        let control =
            FileControl::from_metadata(&self.metadata).map_err(|e| stream.structural(e))?;
        if control.nsblok != 1 {
            let reason = f!("NSBLOK = {} is not supported", control.nsblok);
            return Err(stream.structural(reason).into());
        }

        stream.record(
            "file data",
            &layouts::file_data(&control),
            &mut self.metadata,
        )?;
        if control.ichist > 1 {
            stream.record(
                "file-wide chi",
                &layouts::file_chi(&control),
                &mut self.metadata,
            )?;
        }

        match stream.is_reading() {
            true => self.nuclides_from_labels(stream)?,
            false => self.check_labels(stream)?,
        }

        for nuclide in self.nuclides.iter_mut() {
            nuclide.read_write(stream, &control)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Isotxs {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let int = |k: &str| self.metadata.int(k).unwrap_or_default();
        let setid = self
            .metadata
            .strings("HSETID")
            .map(|s| s.join(" ").trim().to_string())
            .unwrap_or_default();

        writeln!(f, "ISOTXS library")?;
        writeln!(f, "  set id       : {setid}")?;
        writeln!(f, "  groups       : {}", int("NGROUP"))?;
        writeln!(f, "  nuclides     : {}", self.nuclides.len())?;
        writeln!(f, "  max upscat   : {}", int("MAXUP"))?;
        writeln!(f, "  max downscat : {}", int("MAXDN"))?;
        writeln!(f, "  max order    : {}", int("MAXORD"))?;
        if let Some(emin) = self.metadata.float("EMIN") {
            writeln!(f, "  min energy   : {} eV", emin.sci(5, 2))?;
        }
        for nuclide in &self.nuclides {
            let amass = nuclide.metadata.float("AMASS").unwrap_or_default();
            writeln!(
                f,
                "  {:<8} amass {} with {} scattering block(s)",
                nuclide.label,
                amass.sci(5, 2),
                nuclide.scatter.len()
            )?;
        }
        Ok(())
    }
}
