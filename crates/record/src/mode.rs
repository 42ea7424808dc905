//! Stream modes and codec options

use std::str::FromStr;

use crate::error::Error;

/// Direction and encoding of a [Stream](crate::Stream)
///
/// Parsed from the short tags used throughout the CCCC tooling:
///
/// | Tag  | Mode                  |
/// | ---- | --------------------- |
/// | `rb` | [Mode::ReadBinary]    |
/// | `wb` | [Mode::WriteBinary]   |
/// | `ra` | [Mode::ReadAscii]     |
/// | `wa` | [Mode::WriteAscii]    |
///
/// ```rust
/// # use cccc_record::Mode;
/// assert_eq!("rb".parse::<Mode>().unwrap(), Mode::ReadBinary);
/// assert!("rw".parse::<Mode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    WriteBinary,
    ReadBinary,
    WriteAscii,
    ReadAscii,
}

impl Mode {
    /// Build a mode from its parts
    pub fn new(direction: Direction, encoding: Encoding) -> Self {
        match (direction, encoding) {
            (Direction::Read, Encoding::Binary) => Self::ReadBinary,
            (Direction::Write, Encoding::Binary) => Self::WriteBinary,
            (Direction::Read, Encoding::Ascii) => Self::ReadAscii,
            (Direction::Write, Encoding::Ascii) => Self::WriteAscii,
        }
    }

    pub fn is_reading(&self) -> bool {
        self.direction() == Direction::Read
    }

    pub fn direction(&self) -> Direction {
        match self {
            Self::ReadBinary | Self::ReadAscii => Direction::Read,
            Self::WriteBinary | Self::WriteAscii => Direction::Write,
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Self::ReadBinary | Self::WriteBinary => Encoding::Binary,
            Self::ReadAscii | Self::WriteAscii => Encoding::Ascii,
        }
    }

    /// Short tag for the mode, i.e. `rb`
    pub fn tag(&self) -> &'static str {
        match self {
            Self::WriteBinary => "wb",
            Self::ReadBinary => "rb",
            Self::WriteAscii => "wa",
            Self::ReadAscii => "ra",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wb" => Ok(Self::WriteBinary),
            "rb" => Ok(Self::ReadBinary),
            "wa" => Ok(Self::WriteAscii),
            "ra" => Ok(Self::ReadAscii),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Reading or writing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Read,
    Write,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "reading"),
            Self::Write => write!(f, "writing"),
        }
    }
}

/// On-disk representation of the records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// FORTRAN unformatted sequential binary
    Binary,
    /// Fixed width text, one record per line
    Ascii,
}

/// Byte order of binary numbers
///
/// CCCC files are written by FORTRAN codes in whatever order the producing
/// machine uses. The default is therefore [ByteOrder::Native], which only reads
/// files from machines of the same endianness. Set this explicitly to exchange
/// files with machines that differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    Native,
    Little,
    Big,
}

impl ByteOrder {
    pub(crate) fn i32_to_bytes(self, value: i32) -> [u8; 4] {
        match self {
            Self::Native => value.to_ne_bytes(),
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub(crate) fn i32_from_bytes(self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::Native => i32::from_ne_bytes(bytes),
            Self::Little => i32::from_le_bytes(bytes),
            Self::Big => i32::from_be_bytes(bytes),
        }
    }

    pub(crate) fn f32_to_bytes(self, value: f32) -> [u8; 4] {
        match self {
            Self::Native => value.to_ne_bytes(),
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub(crate) fn f32_from_bytes(self, bytes: [u8; 4]) -> f32 {
        match self {
            Self::Native => f32::from_ne_bytes(bytes),
            Self::Little => f32::from_le_bytes(bytes),
            Self::Big => f32::from_be_bytes(bytes),
        }
    }

    pub(crate) fn f64_to_bytes(self, value: f64) -> [u8; 8] {
        match self {
            Self::Native => value.to_ne_bytes(),
            Self::Little => value.to_le_bytes(),
            Self::Big => value.to_be_bytes(),
        }
    }

    pub(crate) fn f64_from_bytes(self, bytes: [u8; 8]) -> f64 {
        match self {
            Self::Native => f64::from_ne_bytes(bytes),
            Self::Little => f64::from_le_bytes(bytes),
            Self::Big => f64::from_be_bytes(bytes),
        }
    }
}

/// Options applied to a [Stream](crate::Stream)
///
/// ```rust
/// # use cccc_record::{ByteOrder, Options};
/// let options = Options::new().with_byte_order(ByteOrder::Big);
/// assert_eq!(options.byte_order, ByteOrder::Big);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Byte order of binary numbers and record markers
    pub byte_order: ByteOrder,
}

impl Options {
    /// Default options, i.e. native byte order
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}
