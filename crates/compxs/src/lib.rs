//! Reader and writer for COMPXS files
//!
//! COMPXS is the CCCC interchange format for multigroup composition
//! macroscopic cross sections. A file is read into a [Compxs] container
//! holding the file-wide values and one [Region] per composition.
//!
//! | Record                        | Held in                        |
//! | ----------------------------- | ------------------------------ |
//! | file identification           | [Compxs::metadata]             |
//! | specifications                | [Compxs::metadata]             |
//! | composition independent data  | [Compxs::metadata]             |
//! | composition specifications    | [Region::metadata]             |
//! | group cross sections          | [Region::groups]               |
//! | scattering band of a group    | [Region::scatter]              |
//! | power conversion factors      | `FPS`/`CPS` of every region    |
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use cccc_compxs::{read_binary, write_binary};
//! let first = read_binary("/path/to/core.COMPXS").unwrap();
//! let second = read_binary("/path/to/reflector.COMPXS").unwrap();
//!
//! // Regions of the second file are numbered after those of the first
//! let merged = first.merge(&second).unwrap();
//! let region = merged.get_region(first.regions.len() + 1).unwrap();
//! println!("{}", region.scatter.get(0, 1));
//!
//! write_binary(&merged, "/path/to/merged.COMPXS").unwrap();
//! ```

mod compxs;
mod error;
mod layouts;
mod region;

// standard library
use std::path::Path;

// internal modules
use cccc_record::{read_file, write_file, Encoding, Options};

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use compxs::Compxs;

#[doc(inline)]
pub use region::Region;

/// Read a binary COMPXS file in native byte order
pub fn read_binary(path: impl AsRef<Path>) -> Result<Compxs> {
    read(path, Encoding::Binary, Options::default())
}

/// Read an ASCII COMPXS file
pub fn read_ascii(path: impl AsRef<Path>) -> Result<Compxs> {
    read(path, Encoding::Ascii, Options::default())
}

/// Write a binary COMPXS file in native byte order
pub fn write_binary(compxs: &Compxs, path: impl AsRef<Path>) -> Result<()> {
    write(compxs, path, Encoding::Binary, Options::default())
}

/// Write an ASCII COMPXS file
pub fn write_ascii(compxs: &Compxs, path: impl AsRef<Path>) -> Result<()> {
    write(compxs, path, Encoding::Ascii, Options::default())
}

/// Read a COMPXS file with explicit options, e.g. a foreign byte order
pub fn read(path: impl AsRef<Path>, encoding: Encoding, options: Options) -> Result<Compxs> {
    read_file(path, encoding, options)
}

/// Write a COMPXS file with explicit options
pub fn write(
    compxs: &Compxs,
    path: impl AsRef<Path>,
    encoding: Encoding,
    options: Options,
) -> Result<()> {
    write_file(compxs, path, encoding, options)
}
