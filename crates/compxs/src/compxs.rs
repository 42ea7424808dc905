// standard library
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// internal modules
use cccc_record::{Array, Format, Metadata, Stream};
use cccc_utils::{f, ValueExt};

// crate modules
use crate::error::{Error, Result};
use crate::layouts::{self, Specifications};
use crate::region::Region;

// external crates
use log::{info, warn};
use serde::Serialize;

/// Data structure for the contents of a COMPXS file
///
/// The file-wide `metadata` holds the fields of the file identification,
/// specifications and composition independent records. Every region keeps its
/// composition specifications and group records, see [Region].
///
/// The region count `NCMP`, the family counts `NKFAM` and the largest band
/// extents `MAXUP`/`MAXDN` are written as they are held. [Compxs::refresh]
/// recomputes them from the regions.
///
/// ```rust
/// # use cccc_compxs::{Compxs, Region};
/// let mut compxs = Compxs::new(2);
/// compxs.add_region(Region::new(1, 2)).unwrap();
/// compxs.add_region(Region::new(2, 2)).unwrap();
///
/// assert_eq!(compxs.metadata.int("NCMP"), Some(2));
/// assert!(compxs.get_region(2).is_some());
/// assert!(compxs.add_region(Region::new(1, 2)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Compxs {
    /// File-wide values
    pub metadata: Metadata,
    /// Regions in file order
    pub regions: Vec<Region>,
}

impl Compxs {
    /// Empty file of `ngroup` groups without delayed neutron families
    pub fn new(ngroup: usize) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("HNAME", Self::NAME);
        metadata.insert("HUSE1", "");
        metadata.insert("HUSE2", "");
        metadata.insert("IVERS", 1);

        for name in layouts::SPECIFICATIONS {
            metadata.insert(name, 0);
        }
        metadata.insert("NGROUP", ngroup as i32);

        metadata.insert("VEL", vec![0.0_f32; ngroup]);
        metadata.insert("EMAX", vec![0.0_f32; ngroup]);
        metadata.insert("EMIN", 0.0_f32);
        metadata.insert("CHID", Array::filled(vec![0, ngroup], 0.0_f32));
        metadata.insert("FLAM", Vec::<f32>::new());

        let mut compxs = Self {
            metadata,
            regions: Vec::new(),
        };
        compxs.refresh();
        compxs
    }

    /// Number of energy groups
    pub fn num_groups(&self) -> Option<usize> {
        self.metadata.count("NGROUP").ok()
    }

    /// Composition numbers of every region in file order
    pub fn numbers(&self) -> Vec<usize> {
        self.regions.iter().map(|r| r.number).collect()
    }

    pub fn get_region(&self, number: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.number == number)
    }

    pub fn get_region_mut(&mut self, number: usize) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.number == number)
    }

    /// Append a region, failing for a duplicate number or mismatched groups
    pub fn add_region(&mut self, region: Region) -> Result<()> {
        if self.get_region(region.number).is_some() {
            return Err(Error::DuplicateRegion(region.number));
        }
        if Some(region.num_groups()) != self.num_groups() {
            return Err(Error::Incompatible {
                field: "NGROUP".to_string(),
            });
        }
        self.regions.push(region);
        self.refresh();
        Ok(())
    }

    /// Recompute the values derived from the regions
    pub fn refresh(&mut self) {
        let mut nkfam = Vec::with_capacity(self.regions.len());
        let (mut maxup, mut maxdn) = (0, 0);
        for region in &self.regions {
            nkfam.push(region.num_families() as i32);
            if let Ok(widths) = region.band_widths() {
                maxup = maxup.max(widths.max_up());
                maxdn = maxdn.max(widths.max_down());
            }
        }

        self.metadata.insert("NCMP", self.regions.len() as i32);
        self.metadata.insert("NKFAM", nkfam);
        self.metadata.insert("MAXUP", maxup as i32);
        self.metadata.insert("MAXDN", maxdn as i32);
    }

    /// Combine two files into a new one
    ///
    /// Regions of `other` are appended after those of `self`, their numbers
    /// offset by the region count of `self`. The group structure, chi and
    /// delayed neutron families must agree. Energy bounds that differ are only
    /// warned about, the values of `self` are kept.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        for field in ["NGROUP", "ICHI", "NFAM"] {
            if self.metadata.int(field) != other.metadata.int(field) {
                return Err(Error::Incompatible {
                    field: field.to_string(),
                });
            }
        }
        for field in ["CHI", "ISSPEC", "CHID", "FLAM"] {
            if self.metadata.get(field) != other.metadata.get(field) {
                return Err(Error::Incompatible {
                    field: field.to_string(),
                });
            }
        }
        if self.metadata.get("EMAX") != other.metadata.get("EMAX")
            || self.metadata.get("EMIN") != other.metadata.get("EMIN")
        {
            warn!("Merging COMPXS files with different group boundaries");
        }

        let offset = self.regions.len();
        let mut merged = self.clone();
        for region in &other.regions {
            let mut region = region.clone();
            region.number += offset;
            if merged.get_region(region.number).is_some() {
                return Err(Error::DuplicateRegion(region.number));
            }
            merged.regions.push(region);
        }
        merged.refresh();
        Ok(merged)
    }

    /// Write the file contents as pretty printed JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        info!("Writing {path:?}");
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Family count of every region, `NKFAM`
    fn families(&self, stream: &Stream, ncmp: usize) -> Result<Vec<usize>> {
        let nkfam = self
            .metadata
            .require_ints("NKFAM")
            .map_err(|e| stream.structural(e))?;
        if nkfam.len() != ncmp {
            let reason = f!("NKFAM has {} values for {ncmp} regions", nkfam.len());
            return Err(stream.structural(reason).into());
        }
        let counts = nkfam
            .as_slice()
            .iter()
            .map(|n| {
                usize::try_from(*n).map_err(|_| cccc_record::Error::NegativeCount {
                    field: "NKFAM".to_string(),
                    value: *n,
                })
            })
            .collect::<cccc_record::Result<_>>()
            .map_err(|e| stream.structural(e))?;
        Ok(counts)
    }

    /// Power conversion factors of every region, in file order
    fn power(&self) -> Metadata {
        let factor = |name: &str| {
            self.regions
                .iter()
                .map(|r| r.metadata.float(name).unwrap_or_default())
                .collect::<Vec<_>>()
        };
        let mut record = Metadata::new();
        record.insert("FPS", factor("FPS"));
        record.insert("CPS", factor("CPS"));
        record
    }
}

impl Format for Compxs {
    const NAME: &'static str = "COMPXS";
    type Error = Error;

    fn read_write(&mut self, stream: &mut Stream) -> Result<()> {
        stream.identification(&mut self.metadata)?;
        stream.record(
            "specifications",
            &layouts::specifications(),
            &mut self.metadata,
        )?;

        let specs =
            Specifications::from_metadata(&self.metadata).map_err(|e| stream.structural(e))?;
        stream.record(
            "composition independent data",
            &layouts::independent(&specs),
            &mut self.metadata,
        )?;

        let nkfam = self.families(stream, specs.ncmp)?;
        if stream.is_reading() {
            self.regions = (1..=specs.ncmp).map(Region::numbered).collect();
        } else if self.regions.len() != specs.ncmp {
            let reason = f!(
                "NCMP = {} but there are {} regions, see Compxs::refresh()",
                specs.ncmp,
                self.regions.len()
            );
            return Err(stream.structural(reason).into());
        }

        for (region, n) in self.regions.iter_mut().zip(nkfam) {
            region.read_write(stream, &specs, n)?;
        }

        let mut record = match stream.is_reading() {
            true => Metadata::new(),
            false => self.power(),
        };
        stream.record("power conversion factors", &layouts::power(&specs), &mut record)?;

        if stream.is_reading() {
            let fps = record.require_floats("FPS")?.as_slice();
            let cps = record.require_floats("CPS")?.as_slice();
            for (region, (f, c)) in self.regions.iter_mut().zip(fps.iter().zip(cps)) {
                region.metadata.insert("FPS", *f);
                region.metadata.insert("CPS", *c);
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Compxs {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let int = |k: &str| self.metadata.int(k).unwrap_or_default();

        writeln!(f, "COMPXS file")?;
        writeln!(f, "  groups       : {}", int("NGROUP"))?;
        writeln!(f, "  regions      : {}", self.regions.len())?;
        writeln!(f, "  families     : {}", int("NFAM"))?;
        writeln!(f, "  max upscat   : {}", int("MAXUP"))?;
        writeln!(f, "  max downscat : {}", int("MAXDN"))?;
        for region in &self.regions {
            let fps = region.metadata.float("FPS").unwrap_or_default();
            let fissile = region.metadata.int("IFIS").unwrap_or_default() > 0;
            writeln!(
                f,
                "  region {:<4} fps {} {}",
                region.number,
                fps.sci(5, 2),
                if fissile { "fissile" } else { "" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_file() {
        let compxs = Compxs::new(3);
        assert_eq!(compxs.metadata.string("HNAME"), Some("COMPXS"));
        assert_eq!(compxs.metadata.int("NCMP"), Some(0));
        assert_eq!(compxs.metadata.int("NFAM"), Some(0));
        assert_eq!(compxs.metadata.ints("NKFAM").map(|a| a.len()), Some(0));
        assert_eq!(compxs.num_groups(), Some(3));
    }

    #[test]
    fn refresh_tracks_bands() {
        let mut compxs = Compxs::new(3);
        let mut region = Region::new(1, 3);
        region.metadata.insert("NUP", vec![0, 1, 0]);
        region.metadata.insert("NDN", vec![0, 0, 2]);
        compxs.add_region(region).unwrap();

        assert_eq!(compxs.metadata.int("MAXUP"), Some(1));
        assert_eq!(compxs.metadata.int("MAXDN"), Some(2));
    }

    #[test]
    fn merge_rejects_mismatch() {
        let a = Compxs::new(2);
        let b = Compxs::new(4);
        assert!(matches!(a.merge(&b), Err(Error::Incompatible { field }) if field == "NGROUP"));

        let mut b = Compxs::new(2);
        b.metadata.insert("NFAM", 6);
        assert!(matches!(a.merge(&b), Err(Error::Incompatible { field }) if field == "NFAM"));
    }

    #[test]
    fn add_rejects_wrong_groups() {
        let mut compxs = Compxs::new(2);
        let result = compxs.add_region(Region::new(1, 3));
        assert!(matches!(result, Err(Error::Incompatible { .. })));
        assert!(compxs.regions.is_empty());
    }

    #[test]
    fn negative_family_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("COMPXS");

        let mut compxs = Compxs::new(2);
        compxs.add_region(Region::new(1, 2)).unwrap();
        compxs.metadata.insert("NKFAM", vec![-1]);

        match crate::write_binary(&compxs, &path).unwrap_err() {
            Error::Record(cccc_record::Error::Structure { reason, .. }) => {
                assert!(reason.contains("NKFAM"), "{reason}");
            }
            error => panic!("unexpected error {error:?}"),
        }
    }

    #[test]
    fn summary() {
        let mut compxs = Compxs::new(2);
        compxs.add_region(Region::new(1, 2)).unwrap();
        let text = compxs.to_string();
        assert!(text.contains("regions      : 1"));
        assert!(text.contains("region 1"));
    }
}
