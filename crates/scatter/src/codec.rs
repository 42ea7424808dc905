//! Conversion between band data as stored on file and sparse matrices
//!
//! On file the band of destination group `g` is stored from the highest
//! source group down, i.e. `g + up` to `g - down`. Bands of consecutive
//! destination groups follow each other, and Legendre orders of a block follow
//! each other with the order outermost.

// crate modules
use crate::band::BandWidths;
use crate::error::{Error, Result};
use crate::matrix::{ScatterBuilder, ScatterMatrix};

/// Sparse matrix from the band values of one Legendre order
///
/// ```rust
/// # use cccc_scatter::{decode_bands, BandWidths};
/// let widths = BandWidths::new(&[0, 0], &[0, 1]).unwrap();
/// // group 1: self, group 2: from 2 then from 1
/// let matrix = decode_bands(&[1.0, 2.0, 0.5], &widths).unwrap();
/// assert_eq!(matrix.get(0, 1), 0.5);
/// assert_eq!(matrix.get(1, 1), 2.0);
/// ```
pub fn decode_bands(values: &[f32], widths: &BandWidths) -> Result<ScatterMatrix> {
    check_length(values.len(), widths.total())?;

    let mut builder = ScatterBuilder::new(widths.num_groups());
    let mut remaining = values;
    for (dest, band) in widths.iter().enumerate() {
        let Some(band) = band else {
            builder.push_column([])?;
            continue;
        };
        let (column, rest) = remaining.split_at(band.width());
        remaining = rest;
        builder.push_column(band.sources(dest).zip(column.iter().rev().copied()))?;
    }
    builder.finish()
}

/// Band values of one Legendre order, the inverse of [decode_bands]
///
/// Entries of the matrix outside of the band are not written.
pub fn encode_bands(matrix: &ScatterMatrix, widths: &BandWidths) -> Result<Vec<f32>> {
    if matrix.num_groups() != widths.num_groups() {
        return Err(Error::SizeMismatch {
            expected: widths.num_groups(),
            found: matrix.num_groups(),
        });
    }

    let mut values = Vec::with_capacity(widths.total());
    for (dest, band) in widths.iter().enumerate() {
        if let Some(band) = band {
            values.extend(band.sources(dest).rev().map(|s| matrix.get(s, dest)));
        }
    }
    Ok(values)
}

/// One sparse matrix per Legendre order from consecutive band data
pub fn decode_orders(
    values: &[f32],
    widths: &BandWidths,
    orders: usize,
) -> Result<Vec<ScatterMatrix>> {
    let kmax = widths.total();
    check_length(values.len(), kmax * orders)?;

    match kmax {
        // chunks() of zero would panic, every order is empty
        0 => (0..orders).map(|_| decode_bands(&[], widths)).collect(),
        _ => values
            .chunks(kmax)
            .map(|order| decode_bands(order, widths))
            .collect(),
    }
}

/// Consecutive band data of several Legendre orders, the inverse of [decode_orders]
pub fn encode_orders(matrices: &[ScatterMatrix], widths: &BandWidths) -> Result<Vec<f32>> {
    let mut values = Vec::with_capacity(widths.total() * matrices.len());
    for matrix in matrices {
        values.extend(encode_bands(matrix, widths)?);
    }
    Ok(values)
}

fn check_length(found: usize, expected: usize) -> Result<()> {
    match found == expected {
        true => Ok(()),
        false => Err(Error::LengthMismatch { expected, found }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_length() {
        let widths = BandWidths::new(&[0, 0], &[0, 1]).unwrap();
        assert_eq!(
            decode_bands(&[1.0, 2.0], &widths),
            Err(Error::LengthMismatch {
                expected: 3,
                found: 2
            })
        );
        assert!(decode_orders(&[1.0; 7], &widths, 2).is_err());
    }

    #[test]
    fn empty_bands() {
        let widths = BandWidths::from_isotxs(&[0, 2, 0], &[0, 1, 0]).unwrap();
        let matrix = decode_bands(&[5.0, 6.0], &widths).unwrap();
        assert_eq!(matrix.column(0).count(), 0);
        assert_eq!(matrix.get(1, 1), 5.0);
        assert_eq!(matrix.get(0, 1), 6.0);
        assert_eq!(encode_bands(&matrix, &widths).unwrap(), vec![5.0, 6.0]);

        let nothing = BandWidths::from_isotxs(&[0, 0], &[0, 0]).unwrap();
        let orders = decode_orders(&[], &nothing, 3).unwrap();
        assert_eq!(orders.len(), 3);
        assert!(orders.iter().all(|m| m.nnz() == 0));
    }

    #[test]
    fn orders_are_outermost() {
        let widths = BandWidths::new(&[0, 0], &[0, 1]).unwrap();
        let values = [1.0, 2.0, 3.0, 10.0, 20.0, 30.0];
        let orders = decode_orders(&values, &widths, 2).unwrap();
        assert_eq!(orders[0].get(0, 1), 3.0);
        assert_eq!(orders[1].get(1, 1), 20.0);
        assert_eq!(encode_orders(&orders, &widths).unwrap(), values);
    }
}
