// internal modules
use cccc_record::{Metadata, Stream, Value};
use cccc_scatter::{decode_bands, encode_bands, BandWidths, ScatterMatrix};
use cccc_utils::f;

// crate modules
use crate::error::{Error, Result};
use crate::layouts::{self, CompositionControl, Specifications};

// external crates
use serde::Serialize;

/// Macroscopic cross sections of one composition
///
/// The `metadata` holds the composition specifications (`ICHI`, `IFIS`, `NUP`,
/// `NDN`, `NUMFAM` and `ISSPEC` where present) and the power conversion
/// factors `FPS` and `CPS` of the region. Every group record is kept in
/// `groups` without its scattering band, which lives in `scatter` instead.
///
/// ```rust
/// # use cccc_compxs::Region;
/// let region = Region::new(1, 4);
/// assert_eq!(region.groups.len(), 4);
/// assert_eq!(region.groups[0].float("XTOT"), Some(0.0));
/// assert_eq!(region.scatter.num_groups(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Composition number, starting from 1
    pub number: usize,
    /// Composition specifications and power conversion factors
    pub metadata: Metadata,
    /// Values of each group record in group order
    pub groups: Vec<Metadata>,
    /// Group to group scattering, column = destination
    pub scatter: ScatterMatrix,
}

impl Region {
    /// Region with zero cross sections and in-group scattering bands only
    pub fn new(number: usize, ngroup: usize) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert("ICHI", 0);
        metadata.insert("IFIS", 0);
        metadata.insert("NUP", vec![0; ngroup]);
        metadata.insert("NDN", vec![0; ngroup]);
        metadata.insert("NUMFAM", Vec::<i32>::new());
        metadata.insert("FPS", 0.0_f32);
        metadata.insert("CPS", 0.0_f32);

        let mut group = Metadata::new();
        for name in layouts::GROUP_LEADING
            .into_iter()
            .chain(layouts::GROUP_TRAILING)
        {
            group.insert(name, 0.0_f32);
        }

        let widths = BandWidths::new(&vec![0; ngroup], &vec![0; ngroup]).unwrap_or_default();
        let scatter = decode_bands(&vec![0.0; widths.total()], &widths)
            .unwrap_or_else(|_| ScatterMatrix::empty(ngroup));

        Self {
            number,
            metadata,
            groups: vec![group; ngroup],
            scatter,
        }
    }

    pub(crate) fn numbered(number: usize) -> Self {
        Self {
            number,
            metadata: Metadata::new(),
            groups: Vec::new(),
            scatter: ScatterMatrix::empty(0),
        }
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Band widths from `NUP` and `NDN`
    pub fn band_widths(&self) -> Result<BandWidths> {
        let nup = self.metadata.require_ints("NUP")?;
        let ndn = self.metadata.require_ints("NDN")?;
        Ok(BandWidths::from_counts(nup.as_slice(), ndn.as_slice())?)
    }

    /// Number of delayed neutron families of the region
    pub fn num_families(&self) -> usize {
        self.metadata.ints("NUMFAM").map_or(0, |a| a.len())
    }

    /// Replace the scattering matrix, updating `NUP` and `NDN` to match
    ///
    /// The matrix is stored in the band described by `widths`, so values
    /// outside of it are dropped.
    pub fn set_scatter(&mut self, matrix: &ScatterMatrix, widths: &BandWidths) -> Result<()> {
        if widths.num_groups() != self.num_groups() {
            return Err(Error::Incompatible {
                field: "NGROUP".to_string(),
            });
        }
        // every COMPXS group has a band, at least the in-group term
        let widths = widths.filled();
        let values = encode_bands(matrix, &widths)?;
        self.scatter = decode_bands(&values, &widths)?;

        let (nup, ndn) = widths.to_counts();
        self.metadata.insert("NUP", nup);
        self.metadata.insert("NDN", ndn);
        Ok(())
    }

    /// Process the composition specifications and group records
    pub(crate) fn read_write(
        &mut self,
        stream: &mut Stream,
        specs: &Specifications,
        nkfam: usize,
    ) -> Result<()> {
        let number = self.number;
        stream.record_with(
            &f!("composition specifications ({number})"),
            &layouts::composition(specs),
            |m| layouts::composition_tail(specs, nkfam, m),
            &mut self.metadata,
        )?;

        let control = CompositionControl::from_metadata(&self.metadata)
            .map_err(|e| stream.structural(f!("region {number}: {e}")))?;
        let widths = self
            .band_widths()
            .map_err(|e| stream.structural(f!("region {number}: {e}")))?;

        let mut bands = Vec::new();
        if stream.is_reading() {
            self.groups = vec![Metadata::new(); specs.ngroup];
        } else {
            if self.groups.len() != specs.ngroup {
                let reason = f!(
                    "region {number} has {} group records, expected {}",
                    self.groups.len(),
                    specs.ngroup
                );
                return Err(stream.structural(reason).into());
            }
            bands = encode_bands(&self.scatter, &widths)
                .map_err(|e| stream.structural(f!("region {number}: {e}")))?;
        }

        let mut offset = 0;
        for (g, band) in widths.iter().enumerate() {
            let width = band.map_or(0, |b| b.width());
            let group = &mut self.groups[g];
            if !stream.is_reading() {
                group.insert("XSCAT", bands[offset..offset + width].to_vec());
            }

            let result = stream.record(
                &f!("group {} ({number})", g + 1),
                &layouts::group(&control, width),
                group,
            );
            // the band is only ever held by the matrix
            let band = group.remove("XSCAT");
            result?;

            if stream.is_reading() {
                let Some(Value::Floats(values)) = band else {
                    let reason = f!("region {number} group {}: no XSCAT", g + 1);
                    return Err(stream.structural(reason).into());
                };
                bands.extend_from_slice(values.as_slice());
            }
            offset += width;
        }

        if stream.is_reading() {
            self.scatter = decode_bands(&bands, &widths)
                .map_err(|e| stream.structural(f!("region {number}: {e}")))?;
        }
        Ok(())
    }
}
