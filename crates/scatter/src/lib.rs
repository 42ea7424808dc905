//! Banded multigroup scattering matrices
//!
//! CCCC files store a group-to-group scattering matrix as one band of source
//! groups per destination group. This crate converts between that band data
//! and a sparse in-memory matrix.
//!
//! - [BandWidths] - extent of the band of every destination group
//! - [ScatterMatrix] - compressed sparse column matrix, column = destination
//! - [ScatterBuilder] - explicit construction of a [ScatterMatrix]
//! - [decode_bands] / [encode_bands] - band data of one Legendre order
//! - [decode_orders] / [encode_orders] - band data of several orders
//!
//! # Example
//!
//! ```rust
//! # use cccc_scatter::{decode_bands, encode_bands, BandWidths};
//! // 3 groups with upscatter into group 2 and downscatter into group 3
//! let widths = BandWidths::new(&[0, 1, 0], &[0, 0, 1]).unwrap();
//!
//! // bands as they appear on file, highest source group first
//! let values = [1.0, 0.2, 2.0, 3.0, 0.3];
//! let matrix = decode_bands(&values, &widths).unwrap();
//!
//! assert_eq!(matrix.get(2, 1), 0.2);
//! assert_eq!(matrix.get(1, 2), 0.3);
//! assert_eq!(matrix.get(0, 2), 0.0);
//! assert_eq!(encode_bands(&matrix, &widths).unwrap(), values);
//! ```

mod band;
mod codec;
mod error;
mod kind;
mod matrix;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use band::{Band, BandWidths};

#[doc(inline)]
pub use codec::{decode_bands, decode_orders, encode_bands, encode_orders};

#[doc(inline)]
pub use kind::ScatterKind;

#[doc(inline)]
pub use matrix::{ScatterBuilder, ScatterMatrix};

/// Dense matrix type used by [ScatterMatrix::to_dense]
pub use nalgebra::DMatrix;
