//! Result and Error types for the COMPXS module

/// Type alias for `Result<T, compxs::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `cccc-compxs`
pub enum Error {
    /// Failure reading or writing the records of a file
    #[error(transparent)]
    Record(#[from] cccc_record::Error),

    /// Inconsistent scattering matrix or band widths
    #[error(transparent)]
    Scatter(#[from] cccc_scatter::Error),

    /// Region numbers must be unique within a file
    #[error("region {0} is already in the file")]
    DuplicateRegion(usize),

    /// Files or regions that can not be combined
    #[error("incompatible values of {field}")]
    Incompatible { field: String },

    /// Failure serialising to JSON
    #[error("failed to write JSON")]
    Json(#[from] serde_json::Error),

    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for any record boundary integrity failure
    pub fn is_boundary(&self) -> bool {
        match self {
            Self::Record(e) => e.is_boundary(),
            _ => false,
        }
    }
}
