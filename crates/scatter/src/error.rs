//! Result and Error types for the scatter module

/// Type alias for `Result<T, scatter::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug, PartialEq)]
/// The error type for `cccc-scatter`
pub enum Error {
    /// Band reaches outside of the group structure
    #[error("band of group index {group} (up {up}, down {down}) exceeds {num_groups} groups")]
    BandOutOfRange {
        group: usize,
        up: usize,
        down: usize,
        num_groups: usize,
    },

    /// ISOTXS band description with `IJJ` outside of `1..=JBAND`
    #[error("invalid band for group index {group} (JBAND {jband}, IJJ {ijj})")]
    InvalidBandIndex { group: usize, jband: i32, ijj: i32 },

    /// Negative upscatter or downscatter count
    #[error("negative band width {value} for group index {group}")]
    NegativeWidth { group: usize, value: i32 },

    /// Band data of the wrong length for the widths
    #[error("expected {expected} band values, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Matrix finalised before every column was pushed
    #[error("matrix has {found} of {expected} columns")]
    IncompleteMatrix { expected: usize, found: usize },

    /// Row indices of a column must be strictly ascending
    #[error("row {row} of column {column} is out of order")]
    ColumnOutOfOrder { column: usize, row: usize },

    /// Number of groups differs between inputs
    #[error("expected {expected} groups, found {found}")]
    SizeMismatch { expected: usize, found: usize },
}
