//! Primitive encodings of record payloads
//!
//! Both codecs buffer a whole record so that the markers either side of the
//! payload can be checked (reading) or computed (writing) in one place.

pub(crate) mod ascii;
mod binary;

pub(crate) use ascii::{AsciiRecordReader, AsciiRecordWriter};
pub(crate) use binary::{BinaryRecordReader, BinaryRecordWriter};

use std::io::{ErrorKind, Read};

use cccc_utils::StringExt;

use crate::error::{Error, Result};

/// Pull primitives out of an open record
pub(crate) trait PrimitiveRead {
    fn read_int(&mut self) -> Result<i32>;

    fn read_float(&mut self) -> Result<f32>;

    fn read_double(&mut self) -> Result<f64>;

    /// Fixed length string with trailing whitespace removed
    fn read_string(&mut self, length: usize) -> Result<String>;

    fn read_flag(&mut self) -> Result<bool> {
        Ok(self.read_int()? != 0)
    }
}

/// Push primitives into an open record
///
/// Writes go to an in-memory buffer and can not fail. Strings arrive already
/// padded to their field length, see [fixed_string].
pub(crate) trait PrimitiveWrite {
    fn write_int(&mut self, value: i32);

    fn write_float(&mut self, value: f32);

    fn write_double(&mut self, value: f64);

    fn write_string(&mut self, padded: &str);

    fn write_flag(&mut self, value: bool) {
        self.write_int(value as i32)
    }
}

/// Pad `value` to exactly `length` ASCII characters for field `field`
///
/// Control characters are rejected along with non-ASCII ones, a newline
/// would split an ASCII record over two lines.
pub(crate) fn fixed_string(field: &str, value: &str, length: usize) -> Result<String> {
    if !value.is_ascii() || value.chars().any(|c| c.is_ascii_control()) {
        return Err(Error::InvalidString(value.to_string()));
    }
    value.fixed_width(length).ok_or_else(|| Error::LengthMismatch {
        field: field.to_string(),
        expected: length,
        found: value.len(),
    })
}

/// ASCII bytes to a string with trailing whitespace stripped
pub(crate) fn ascii_string(bytes: &[u8]) -> Result<String> {
    match bytes.is_ascii() {
        true => Ok(String::from_utf8_lossy(bytes).trim_end().to_string()),
        false => Err(Error::InvalidString(
            String::from_utf8_lossy(bytes).to_string(),
        )),
    }
}

/// True when the reader has nothing left, used to spot trailing data
pub(crate) fn at_end<R: Read>(reader: &mut R) -> Result<bool> {
    let mut buffer = [0u8; 1];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(true),
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}
