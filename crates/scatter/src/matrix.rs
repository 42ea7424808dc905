//! Compressed sparse column storage of a group-to-group matrix

// crate modules
use crate::band::BandWidths;
use crate::error::{Error, Result};

// external crates
use nalgebra::DMatrix;
use serde::Serialize;

/// Sparse G x G scattering matrix
///
/// Column `g` holds the scattering into destination group `g`, with rows
/// being the source groups in ascending order. Only stored entries are kept,
/// and anything else reads back as zero.
///
/// Matrices are created through a [ScatterBuilder], or from band data with
/// [decode_bands](crate::decode_bands).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterMatrix {
    num_groups: usize,
    offsets: Vec<usize>,
    rows: Vec<usize>,
    values: Vec<f32>,
}

impl ScatterMatrix {
    /// Matrix of `num_groups` groups with nothing stored
    pub fn empty(num_groups: usize) -> Self {
        Self {
            num_groups,
            offsets: vec![0; num_groups + 1],
            rows: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    /// Number of stored entries, including any explicit zeros in the band
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Scattering from `source` into `dest`, zero if not stored
    pub fn get(&self, source: usize, dest: usize) -> f32 {
        let Some((rows, values)) = self.column_slices(dest) else {
            return 0.0;
        };
        match rows.binary_search(&source) {
            Ok(i) => values[i],
            Err(_) => 0.0,
        }
    }

    /// Stored `(source, value)` entries of destination group `dest`
    pub fn column(&self, dest: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let (rows, values) = self.column_slices(dest).unwrap_or((&[], &[]));
        rows.iter().copied().zip(values.iter().copied())
    }

    fn column_slices(&self, dest: usize) -> Option<(&[usize], &[f32])> {
        if dest >= self.num_groups {
            return None;
        }
        let range = self.offsets[dest]..self.offsets[dest + 1];
        Some((&self.rows[range.clone()], &self.values[range]))
    }

    /// Total scattering out of each source group, i.e. the row sums
    pub fn row_sums(&self) -> Vec<f32> {
        let mut sums = vec![0.0; self.num_groups];
        for (row, value) in self.rows.iter().zip(&self.values) {
            sums[*row] += value;
        }
        sums
    }

    /// Copy with every stored value multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            values: self.values.iter().map(|v| v * factor).collect(),
            ..self.clone()
        }
    }

    /// Dense matrix indexed by `(source, dest)`
    ///
    /// ```rust
    /// # use cccc_scatter::ScatterBuilder;
    /// let mut builder = ScatterBuilder::new(2);
    /// builder.push_column([(0, 1.0)]).unwrap();
    /// builder.push_column([(0, 0.5), (1, 2.0)]).unwrap();
    /// let matrix = builder.finish().unwrap();
    ///
    /// let dense = matrix.to_dense();
    /// assert_eq!(dense[(0, 1)], 0.5);
    /// assert_eq!(dense[(1, 0)], 0.0);
    /// ```
    pub fn to_dense(&self) -> DMatrix<f32> {
        let mut dense = DMatrix::zeros(self.num_groups, self.num_groups);
        for dest in 0..self.num_groups {
            for (source, value) in self.column(dest) {
                dense[(source, dest)] = value;
            }
        }
        dense
    }

    /// Sparse matrix holding the in-band values of `dense`
    ///
    /// Every position inside the band is stored, zero or not. Values outside
    /// of the band are dropped.
    pub fn from_dense(dense: &DMatrix<f32>, widths: &BandWidths) -> Result<Self> {
        let n = widths.num_groups();
        if dense.nrows() != n || dense.ncols() != n {
            return Err(Error::SizeMismatch {
                expected: n,
                found: dense.nrows().max(dense.ncols()),
            });
        }

        let mut builder = ScatterBuilder::new(n);
        for (dest, band) in widths.iter().enumerate() {
            match band {
                Some(band) => builder
                    .push_column(band.sources(dest).map(|source| (source, dense[(source, dest)])))?,
                None => builder.push_column([])?,
            }
        }
        builder.finish()
    }
}

/// Incremental construction of a [ScatterMatrix]
///
/// Columns are pushed in destination group order and the matrix is
/// finalised once with [finish](Self::finish).
///
/// ```rust
/// # use cccc_scatter::ScatterBuilder;
/// let mut builder = ScatterBuilder::new(2);
/// builder.push_column([(0, 1.0), (1, 0.1)]).unwrap();
/// assert!(builder.clone().finish().is_err());
///
/// builder.push_column([(1, 2.0)]).unwrap();
/// let matrix = builder.finish().unwrap();
/// assert_eq!(matrix.get(1, 0), 0.1);
/// assert_eq!(matrix.get(0, 1), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct ScatterBuilder {
    num_groups: usize,
    offsets: Vec<usize>,
    rows: Vec<usize>,
    values: Vec<f32>,
}

impl ScatterBuilder {
    pub fn new(num_groups: usize) -> Self {
        Self {
            num_groups,
            offsets: vec![0],
            rows: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Number of columns pushed so far
    pub fn columns(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Add the next column as `(source, value)` entries in ascending source order
    pub fn push_column<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (usize, f32)>,
    {
        let column = self.columns();
        if column >= self.num_groups {
            return Err(Error::SizeMismatch {
                expected: self.num_groups,
                found: column + 1,
            });
        }

        let start = self.rows.len();
        for (row, value) in entries {
            let in_order = self.rows[start..].last().map_or(true, |last| row > *last);
            if !in_order || row >= self.num_groups {
                // leave the builder as it was before the push
                self.rows.truncate(start);
                self.values.truncate(start);
                return Err(Error::ColumnOutOfOrder { column, row });
            }
            self.rows.push(row);
            self.values.push(value);
        }

        self.offsets.push(self.rows.len());
        Ok(())
    }

    /// Finalise the matrix, failing unless every column was pushed
    pub fn finish(self) -> Result<ScatterMatrix> {
        if self.columns() != self.num_groups {
            return Err(Error::IncompleteMatrix {
                expected: self.num_groups,
                found: self.columns(),
            });
        }
        Ok(ScatterMatrix {
            num_groups: self.num_groups,
            offsets: self.offsets,
            rows: self.rows,
            values: self.values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_must_ascend() {
        let mut builder = ScatterBuilder::new(3);
        assert_eq!(
            builder.push_column([(1, 1.0), (0, 1.0)]),
            Err(Error::ColumnOutOfOrder { column: 0, row: 0 })
        );
        assert_eq!(
            builder.push_column([(3, 1.0)]),
            Err(Error::ColumnOutOfOrder { column: 0, row: 3 })
        );
        assert_eq!(builder.columns(), 0);
    }

    #[test]
    fn too_many_columns() {
        let mut builder = ScatterBuilder::new(1);
        builder.push_column([(0, 1.0)]).unwrap();
        assert!(matches!(
            builder.push_column([]),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn dense_round_trip() {
        let widths = BandWidths::new(&[1, 1, 0], &[0, 1, 2]).unwrap();
        let dense = DMatrix::from_fn(3, 3, |i, j| (10 * i + j) as f32 + 1.0);
        let matrix = ScatterMatrix::from_dense(&dense, &widths).unwrap();

        // in band
        assert_eq!(matrix.get(0, 0), 1.0);
        assert_eq!(matrix.get(1, 0), 11.0);
        assert_eq!(matrix.get(0, 2), 3.0);
        // out of band
        assert_eq!(matrix.get(2, 0), 0.0);
        assert_eq!(matrix.nnz(), widths.total());

        let back = matrix.to_dense();
        assert_eq!(back[(2, 1)], 22.0);
        assert_eq!(back[(2, 0)], 0.0);
        assert_eq!(BandWidths::covering(&matrix), widths);
    }

    #[test]
    fn scaling() {
        let mut builder = ScatterBuilder::new(2);
        builder.push_column([(0, 1.0), (1, 0.5)]).unwrap();
        builder.push_column([(1, 2.0)]).unwrap();
        let matrix = builder.finish().unwrap().scaled(2.0);
        assert_eq!(matrix.get(1, 0), 1.0);
        assert_eq!(matrix.row_sums(), vec![2.0, 5.0]);
    }
}
