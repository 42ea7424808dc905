//! Result and Error types for the record module

use std::path::PathBuf;

use crate::mode::Direction;

/// Type alias for `Result<T, record::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `cccc-record`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    Io(#[from] std::io::Error),

    /// Target path does not exist or could not be opened for reading
    #[error("unable to open {path:?} for reading")]
    MissingFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Mode tag is not one of the supported `rb`, `wb`, `ra`, `wa`
    #[error("unknown stream mode \"{0}\" (expected one of rb, wb, ra, wa)")]
    UnknownMode(String),

    /// Attempted to read past the declared end of a record
    #[error("read beyond end of record (declared {declared} bytes, requested {requested})")]
    RecordOverrun { declared: usize, requested: usize },

    /// Record closed before all of the declared bytes were consumed
    #[error("record not fully consumed (declared {declared} bytes, consumed {consumed})")]
    RecordUnderrun { declared: usize, consumed: usize },

    /// Leading and trailing record markers disagree
    #[error("record markers disagree (leading {leading}, trailing {trailing})")]
    MarkerMismatch { leading: i64, trailing: i64 },

    /// File ended inside a record
    #[error("record truncated (declared {declared} bytes)")]
    TruncatedRecord { declared: usize },

    /// A record marker that can not be a byte count
    #[error("invalid record marker {0}")]
    InvalidMarker(i64),

    /// No more records where one was expected
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Field required for writing (or for sizing later records) is not set
    #[error("field \"{0}\" is not set")]
    MissingField(String),

    /// Value stored under a field name is of a different kind
    #[error("field \"{field}\" is not of kind {expected}")]
    TypeMismatch { field: String, expected: String },

    /// Value length disagrees with the declared field length
    #[error("field \"{field}\" has length {found} (expected {expected})")]
    LengthMismatch {
        field: String,
        expected: usize,
        found: usize,
    },

    /// Array data inconsistent with its shape
    #[error("array of {found} values can not have shape {shape:?}")]
    ShapeMismatch { shape: Vec<usize>, found: usize },

    /// Counts and dimensions must be non-negative
    #[error("field \"{field}\" must be non-negative (found {value})")]
    NegativeCount { field: String, value: i32 },

    /// Strings are expected to be printable ASCII
    #[error("string {0:?} is not printable ASCII")]
    InvalidString(String),

    /// ASCII token could not be parsed as the expected kind
    #[error("failed to parse \"{token}\" as {kind}")]
    InvalidToken { token: String, kind: String },

    /// Record sequence inconsistent with the format definition
    #[error("inconsistent {format} file {path:?} while {direction}, before record {position}: {reason}")]
    Structure {
        format: String,
        path: PathBuf,
        direction: Direction,
        position: usize,
        reason: String,
    },

    /// Any failure inside a record, with enough context to find it
    #[error("failed {direction} record {position} (\"{record}\") of {format} file {path:?}")]
    Record {
        format: String,
        path: PathBuf,
        record: String,
        position: usize,
        direction: Direction,
        source: Box<Error>,
    },
}

impl Error {
    /// True for any record boundary integrity failure
    ///
    /// Looks through the [Error::Record] context wrapper, so this works on
    /// errors returned from whole-file operations.
    pub fn is_boundary(&self) -> bool {
        match self {
            Self::RecordOverrun { .. }
            | Self::RecordUnderrun { .. }
            | Self::MarkerMismatch { .. }
            | Self::TruncatedRecord { .. }
            | Self::InvalidMarker(_) => true,
            Self::Record { source, .. } => source.is_boundary(),
            _ => false,
        }
    }

    /// The innermost error, without any record context
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Record { source, .. } => source.root_cause(),
            _ => self,
        }
    }
}
