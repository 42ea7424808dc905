//! Per-group extent of the stored scattering band

// crate modules
use crate::error::{Error, Result};
use crate::matrix::ScatterMatrix;

// external crates
use serde::Serialize;

/// Source groups stored for one destination group
///
/// For destination group `g` the band covers source groups `g - down` to
/// `g + up` inclusive. Group indices are zero-based with the highest energy
/// group first, so `up` counts upscatter sources and `down` downscatter
/// sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Band {
    pub up: usize,
    pub down: usize,
}

impl Band {
    pub fn new(up: usize, down: usize) -> Self {
        Self { up, down }
    }

    /// Number of values stored for the band
    pub fn width(&self) -> usize {
        self.up + self.down + 1
    }

    /// Source group range of the band for destination group `g`
    pub fn sources(&self, g: usize) -> std::ops::RangeInclusive<usize> {
        (g - self.down)..=(g + self.up)
    }
}

/// Band of every destination group in a scattering block
///
/// A group with no band (`None`) stores no values at all, which only the
/// ISOTXS layout can express (`JBAND = 0`).
///
/// ```rust
/// # use cccc_scatter::{Band, BandWidths};
/// // 3 groups, upscatter into group 2 and downscatter into group 3
/// let widths = BandWidths::new(&[0, 1, 0], &[0, 0, 1]).unwrap();
/// assert_eq!(widths.get(1), Some(Band::new(1, 0)));
/// assert_eq!(widths.total(), 5);
///
/// // source group 4 does not exist
/// assert!(BandWidths::new(&[0, 0, 1], &[0, 0, 0]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BandWidths {
    bands: Vec<Option<Band>>,
}

impl BandWidths {
    /// Widths from upscatter and downscatter counts, one per group
    pub fn new(up: &[usize], down: &[usize]) -> Result<Self> {
        if up.len() != down.len() {
            return Err(Error::SizeMismatch {
                expected: up.len(),
                found: down.len(),
            });
        }
        let bands = up
            .iter()
            .zip(down)
            .map(|(u, d)| Some(Band::new(*u, *d)))
            .collect();
        Self::from_bands(bands)
    }

    /// Widths from a list of optional bands, checked against the group count
    pub fn from_bands(bands: Vec<Option<Band>>) -> Result<Self> {
        let num_groups = bands.len();
        for (group, band) in bands.iter().enumerate() {
            let Some(band) = band else { continue };
            if band.down > group || group + band.up >= num_groups {
                return Err(Error::BandOutOfRange {
                    group,
                    up: band.up,
                    down: band.down,
                    num_groups,
                });
            }
        }
        Ok(Self { bands })
    }

    /// Widths from the COMPXS `NUP` and `NDN` arrays
    pub fn from_counts(nup: &[i32], ndn: &[i32]) -> Result<Self> {
        let up = non_negative(nup)?;
        let down = non_negative(ndn)?;
        Self::new(&up, &down)
    }

    /// Widths from the ISOTXS `JBAND` and `IJJ` arrays
    ///
    /// `JBAND` is the number of groups in the band and `IJJ` the position of
    /// in-group scattering within it, so `up = IJJ - 1` and
    /// `down = JBAND - IJJ`. A zero `JBAND` is an empty band.
    ///
    /// ```rust
    /// # use cccc_scatter::{Band, BandWidths};
    /// let widths = BandWidths::from_isotxs(&[1, 2, 0], &[1, 2, 0]).unwrap();
    /// assert_eq!(widths.get(1), Some(Band::new(1, 0)));
    /// assert_eq!(widths.get(2), None);
    /// assert_eq!(widths.to_isotxs(), (vec![1, 2, 0], vec![1, 2, 0]));
    /// ```
    pub fn from_isotxs(jband: &[i32], ijj: &[i32]) -> Result<Self> {
        if jband.len() != ijj.len() {
            return Err(Error::SizeMismatch {
                expected: jband.len(),
                found: ijj.len(),
            });
        }

        let mut bands = Vec::with_capacity(jband.len());
        for (group, (&j, &i)) in jband.iter().zip(ijj).enumerate() {
            let band = match j {
                0 => None,
                j if j > 0 && (1..=j).contains(&i) => {
                    Some(Band::new((i - 1) as usize, (j - i) as usize))
                }
                _ => {
                    return Err(Error::InvalidBandIndex {
                        group,
                        jband: j,
                        ijj: i,
                    })
                }
            };
            bands.push(band);
        }
        Self::from_bands(bands)
    }

    /// The ISOTXS `(JBAND, IJJ)` arrays, empty bands are written as `(0, 0)`
    pub fn to_isotxs(&self) -> (Vec<i32>, Vec<i32>) {
        self.bands
            .iter()
            .map(|band| match band {
                Some(b) => (b.width() as i32, b.up as i32 + 1),
                None => (0, 0),
            })
            .unzip()
    }

    /// The COMPXS `(NUP, NDN)` arrays, empty bands are written as `(0, 0)`
    pub fn to_counts(&self) -> (Vec<i32>, Vec<i32>) {
        self.bands
            .iter()
            .map(|band| match band {
                Some(b) => (b.up as i32, b.down as i32),
                None => (0, 0),
            })
            .unzip()
    }

    /// Narrowest widths holding every non-zero value of `matrix`
    ///
    /// Columns with no non-zero values get an empty band.
    pub fn covering(matrix: &ScatterMatrix) -> Self {
        let bands = (0..matrix.num_groups())
            .map(|g| {
                let mut rows = matrix
                    .column(g)
                    .filter(|(_, value)| *value != 0.0)
                    .map(|(row, _)| row);
                let first = rows.next()?;
                let last = rows.last().unwrap_or(first);
                Some(Band::new(last.saturating_sub(g), g.saturating_sub(first)))
            })
            .collect();
        Self { bands }
    }

    /// Copy of the widths with every empty band replaced by in-group only
    pub fn filled(&self) -> Self {
        let bands = self
            .bands
            .iter()
            .map(|band| Some(band.unwrap_or(Band::new(0, 0))))
            .collect();
        Self { bands }
    }

    pub fn num_groups(&self) -> usize {
        self.bands.len()
    }

    /// Band of destination group `g`, `None` if empty or out of range
    pub fn get(&self, g: usize) -> Option<Band> {
        self.bands.get(g).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Band>> + '_ {
        self.bands.iter().copied()
    }

    /// Number of band values in one Legendre order, `KMAX` in ISOTXS
    pub fn total(&self) -> usize {
        self.bands.iter().flatten().map(Band::width).sum()
    }

    /// Largest upscatter extent of any group
    pub fn max_up(&self) -> usize {
        self.bands.iter().flatten().map(|b| b.up).max().unwrap_or(0)
    }

    /// Largest downscatter extent of any group
    pub fn max_down(&self) -> usize {
        self.bands.iter().flatten().map(|b| b.down).max().unwrap_or(0)
    }
}

fn non_negative(values: &[i32]) -> Result<Vec<usize>> {
    values
        .iter()
        .enumerate()
        .map(|(group, &value)| {
            usize::try_from(value).map_err(|_| Error::NegativeWidth { group, value })
        })
        .collect()
}
