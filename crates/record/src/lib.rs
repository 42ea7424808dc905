//! Record and stream engine for CCCC interchange files
//!
//! CCCC files are sequences of FORTRAN unformatted records. Each record is
//! described once as a [Layout] of named fields, and that one description is
//! used for reading and writing in either encoding.
//!
//! | Encoding           | Record framing                                  |
//! | ------------------ | ----------------------------------------------- |
//! | [Encoding::Binary] | `<int32 N> <N bytes> <int32 N>`                 |
//! | [Encoding::Ascii]  | `<count> <fixed width tokens> <count>` per line |
//!
//! Decoded values land in a [Metadata] map keyed by field name. Fields that
//! were never read stay unset, which is how conditional records are told
//! apart from records full of zeros.
//!
//! Format crates implement [Format] to list their record sequence, and get
//! whole-file reads and writes through [read_file] and [write_file].
//!
//! ```rust, no_run
//! # use cccc_record::{Layout, Metadata, Mode, Stream};
//! let mut stream = Stream::open("path/to/file", Mode::ReadBinary, "ISOTXS").unwrap();
//! let mut control = Metadata::new();
//!
//! stream.identification(&mut control).unwrap();
//! stream
//!     .record(
//!         "file control",
//!         &Layout::new().implicit(&["NGROUP", "NISO"]),
//!         &mut control,
//!     )
//!     .unwrap();
//!
//! println!("{} groups", control.int("NGROUP").unwrap());
//! ```

mod codec;
mod error;
mod layout;
mod metadata;
mod mode;
mod stream;

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use layout::{Field, Kind, Layout};

#[doc(inline)]
pub use metadata::{Array, Metadata, Value};

#[doc(inline)]
pub use mode::{ByteOrder, Direction, Encoding, Mode, Options};

#[doc(inline)]
pub use stream::{read_file, write_file, Format, Stream};

/// Width constants of the fixed width text encoding
pub mod ascii {
    pub use crate::codec::ascii::{FLOAT_PRECISION, FLOAT_WIDTH, INT_WIDTH};
}
