//! Fixed width text records
//!
//! Each record is a single line framed by the byte count the equivalent binary
//! record would have, so the two encodings carry identical markers.
//!
//! ```text
//! <count> <field> <field> ... <count>\n
//! ```
//!
//! | Primitive | Token                                             |
//! | --------- | ------------------------------------------------- |
//! | int       | space + `%+11d`                                   |
//! | float     | space + `%+.16E` right justified in 24 characters |
//! | double    | as float                                          |
//! | string    | space + value left justified to the field length  |
//!
//! Reading is positional. One leading space is skipped before every field and
//! exactly one field width is then consumed, so strings may contain spaces.

// standard library
use std::io::{BufRead, Write};

// internal modules
use cccc_utils::{f, ValueExt};

// crate modules
use crate::codec::{ascii_string, PrimitiveRead, PrimitiveWrite};
use crate::error::{Error, Result};

/// Width of an integer token, `len("2147483647") + 1` for the sign
pub const INT_WIDTH: usize = 11;

/// Digits after the decimal point of a float token
pub const FLOAT_PRECISION: usize = 16;

/// Width of a float token: sign and digit, point and `E`, mantissa digits, exponent
pub const FLOAT_WIDTH: usize = 2 + 2 + FLOAT_PRECISION + 4;

/// Reader for one text record
pub(crate) struct AsciiRecordReader {
    line: Vec<u8>,
    cursor: usize,
    declared: usize,
    consumed: usize,
}

impl AsciiRecordReader {
    /// Read the next line and its leading count
    pub(crate) fn open<R: BufRead>(reader: &mut R) -> Result<Self> {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Err(Error::UnexpectedEof);
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }

        let mut record = Self {
            line,
            cursor: 0,
            declared: 0,
            consumed: 0,
        };

        let leading = record.next_int()?;
        record.declared = usize::try_from(leading).map_err(|_| Error::InvalidMarker(leading.into()))?;
        Ok(record)
    }

    /// Check the payload was consumed exactly and the trailing count agrees
    pub(crate) fn close(mut self) -> Result<usize> {
        if self.consumed != self.declared {
            return Err(Error::RecordUnderrun {
                declared: self.declared,
                consumed: self.consumed,
            });
        }

        let trailing = self.next_int()?;
        if trailing as i64 != self.declared as i64 {
            return Err(Error::MarkerMismatch {
                leading: self.declared as i64,
                trailing: trailing.into(),
            });
        }

        if self.cursor != self.line.len() {
            return Err(Error::InvalidToken {
                token: String::from_utf8_lossy(&self.line[self.cursor..]).to_string(),
                kind: "end of record".to_string(),
            });
        }
        Ok(self.declared)
    }

    /// Account for `bytes` of binary-equivalent payload
    fn consume(&mut self, bytes: usize) -> Result<()> {
        let requested = self.consumed + bytes;
        if requested > self.declared {
            return Err(Error::RecordOverrun {
                declared: self.declared,
                requested,
            });
        }
        self.consumed = requested;
        Ok(())
    }

    /// Skip one space and take the next `width` characters
    fn next_field(&mut self, width: usize) -> Result<&[u8]> {
        let start = self.cursor + 1;
        let end = start + width;
        if end > self.line.len() {
            return Err(Error::TruncatedRecord {
                declared: self.declared,
            });
        }
        self.cursor = end;
        Ok(&self.line[start..end])
    }

    fn next_int(&mut self) -> Result<i32> {
        let token = self.next_field(INT_WIDTH)?;
        parse_token(token, "int")
    }

    fn next_real(&mut self) -> Result<f64> {
        let token = self.next_field(FLOAT_WIDTH)?;
        parse_token(token, "float")
    }
}

impl PrimitiveRead for AsciiRecordReader {
    fn read_int(&mut self) -> Result<i32> {
        self.consume(4)?;
        self.next_int()
    }

    fn read_float(&mut self) -> Result<f32> {
        self.consume(4)?;
        Ok(self.next_real()? as f32)
    }

    fn read_double(&mut self) -> Result<f64> {
        self.consume(8)?;
        self.next_real()
    }

    fn read_string(&mut self, length: usize) -> Result<String> {
        self.consume(length)?;
        ascii_string(self.next_field(length)?)
    }
}

fn parse_token<T: std::str::FromStr>(token: &[u8], kind: &str) -> Result<T> {
    let text = String::from_utf8_lossy(token);
    text.trim().parse::<T>().map_err(|_| Error::InvalidToken {
        token: text.to_string(),
        kind: kind.to_string(),
    })
}

/// Writer for one text record, counts are added on [finish](Self::finish)
pub(crate) struct AsciiRecordWriter {
    payload: String,
    bytes: usize,
}

impl AsciiRecordWriter {
    pub(crate) fn new() -> Self {
        Self {
            payload: String::new(),
            bytes: 0,
        }
    }

    /// Write the framed record as one line, returning the byte count
    pub(crate) fn finish<W: Write>(self, writer: &mut W) -> Result<usize> {
        let count = i32::try_from(self.bytes).map_err(|_| Error::InvalidMarker(self.bytes as i64))?;
        writeln!(
            writer,
            "{}{}{}",
            int_token(count),
            self.payload,
            int_token(count)
        )?;
        Ok(self.bytes)
    }

    fn push_real(&mut self, value: f64) {
        self.payload.push_str(&real_token(value));
    }
}

impl PrimitiveWrite for AsciiRecordWriter {
    fn write_int(&mut self, value: i32) {
        self.bytes += 4;
        self.payload.push_str(&int_token(value));
    }

    fn write_float(&mut self, value: f32) {
        self.bytes += 4;
        self.push_real(value as f64);
    }

    fn write_double(&mut self, value: f64) {
        self.bytes += 8;
        self.push_real(value);
    }

    fn write_string(&mut self, padded: &str) {
        self.bytes += padded.len();
        self.payload.push(' ');
        self.payload.push_str(padded);
    }
}

fn int_token(value: i32) -> String {
    f!(" {:+width$}", value, width = INT_WIDTH)
}

fn real_token(value: f64) -> String {
    f!(
        " {:>width$}",
        value.fortran(FLOAT_PRECISION, 2),
        width = FLOAT_WIDTH
    )
}
