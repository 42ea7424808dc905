//! Reader and writer for ISOTXS files
//!
//! ISOTXS is the CCCC interchange format for multigroup nuclide microscopic
//! cross sections. A file is read into an [Isotxs] container holding the
//! file-wide values and one [Nuclide] per `HISONM` label.
//!
//! | Record                    | Held in                             |
//! | ------------------------- | ----------------------------------- |
//! | file identification       | [Isotxs::metadata]                  |
//! | file control              | [Isotxs::metadata]                  |
//! | file data                 | [Isotxs::metadata]                  |
//! | file-wide chi             | [Isotxs::metadata] (`ICHIST > 1`)   |
//! | nuclide control           | [Nuclide::metadata]                 |
//! | principal cross sections  | [Nuclide::metadata]                 |
//! | nuclide chi               | [Nuclide::metadata] (`ICHI > 1`)    |
//! | scattering sub-blocks     | [Nuclide::scatter], one per block   |
//!
//! Only files with a single scattering sub-block per block (`NSBLOK = 1`) are
//! supported.
//!
//! # Quickstart example
//!
//! ```rust, no_run
//! # use cccc_isotxs::{read_binary, write_ascii};
//! // Read every nuclide of a binary library
//! let library = read_binary("/path/to/ISOTXS").unwrap();
//!
//! // Find the elastic scattering of U-235 from group 1 into group 2
//! let u235 = library.get_nuclide("U235AA").unwrap();
//! let p0 = u235.get_scatter_block(0).unwrap().order(0).unwrap();
//! println!("{}", p0.get(0, 1));
//!
//! // Convert to the text encoding
//! write_ascii(&library, "/path/to/ISOTXS.txt").unwrap();
//! ```

mod error;
mod isotxs;
mod layouts;
mod nuclide;

// standard library
use std::path::Path;

// internal modules
use cccc_record::{read_file, write_file, Encoding, Options};

// flatten public API and inline the documentation
#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use isotxs::Isotxs;

#[doc(inline)]
pub use nuclide::{Nuclide, ScatterBlock};

#[doc(inline)]
pub use cccc_scatter::ScatterKind;

/// Read a binary ISOTXS file in native byte order
pub fn read_binary(path: impl AsRef<Path>) -> Result<Isotxs> {
    read(path, Encoding::Binary, Options::default())
}

/// Read an ASCII ISOTXS file
pub fn read_ascii(path: impl AsRef<Path>) -> Result<Isotxs> {
    read(path, Encoding::Ascii, Options::default())
}

/// Write a binary ISOTXS file in native byte order
pub fn write_binary(library: &Isotxs, path: impl AsRef<Path>) -> Result<()> {
    write(library, path, Encoding::Binary, Options::default())
}

/// Write an ASCII ISOTXS file
pub fn write_ascii(library: &Isotxs, path: impl AsRef<Path>) -> Result<()> {
    write(library, path, Encoding::Ascii, Options::default())
}

/// Read an ISOTXS file with explicit options, i.e. a foreign byte order
pub fn read(path: impl AsRef<Path>, encoding: Encoding, options: Options) -> Result<Isotxs> {
    read_file(path, encoding, options)
}

/// Write an ISOTXS file with explicit options
pub fn write(
    library: &Isotxs,
    path: impl AsRef<Path>,
    encoding: Encoding,
    options: Options,
) -> Result<()> {
    write_file(library, path, encoding, options)
}
