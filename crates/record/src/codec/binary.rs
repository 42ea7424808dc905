//! FORTRAN unformatted sequential records
//!
//! ```text
//! <int32 N> <N bytes of packed primitives> <int32 N>
//! ```
//!
//! Numbers are 4-byte ints, 4-byte IEEE singles and 8-byte IEEE doubles in the
//! configured [ByteOrder]. Strings are raw bytes.

// standard library
use std::io::{ErrorKind, Read, Write};

// crate modules
use crate::codec::{ascii_string, PrimitiveRead, PrimitiveWrite};
use crate::error::{Error, Result};
use crate::mode::ByteOrder;

/// Reader for one binary record
///
/// The whole payload is pulled in on open, so over-reads are caught before
/// they can consume the trailing marker or the next record.
pub(crate) struct BinaryRecordReader<'a, R: Read> {
    reader: &'a mut R,
    order: ByteOrder,
    payload: Vec<u8>,
    position: usize,
}

impl<'a, R: Read> BinaryRecordReader<'a, R> {
    /// Read the leading marker and the payload it declares
    pub(crate) fn open(reader: &'a mut R, order: ByteOrder) -> Result<Self> {
        let leading = read_marker(reader, order)?.ok_or(Error::UnexpectedEof)?;
        let declared = usize::try_from(leading).map_err(|_| Error::InvalidMarker(leading.into()))?;

        let mut payload = Vec::with_capacity(declared.min(1 << 20));
        reader
            .by_ref()
            .take(declared as u64)
            .read_to_end(&mut payload)?;

        if payload.len() < declared {
            return Err(Error::TruncatedRecord { declared });
        }

        Ok(Self {
            reader,
            order,
            payload,
            position: 0,
        })
    }

    /// Check the payload was consumed exactly and the trailing marker agrees
    pub(crate) fn close(self) -> Result<usize> {
        let declared = self.payload.len();
        if self.position != declared {
            return Err(Error::RecordUnderrun {
                declared,
                consumed: self.position,
            });
        }

        let trailing = match read_marker(self.reader, self.order) {
            Ok(Some(marker)) => marker,
            Ok(None) | Err(Error::TruncatedRecord { .. }) => {
                return Err(Error::TruncatedRecord { declared })
            }
            Err(e) => return Err(e),
        };

        if trailing as i64 != declared as i64 {
            return Err(Error::MarkerMismatch {
                leading: declared as i64,
                trailing: trailing.into(),
            });
        }
        Ok(declared)
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.position + N;
        let bytes = self
            .payload
            .get(self.position..end)
            .ok_or(Error::RecordOverrun {
                declared: self.payload.len(),
                requested: end,
            })?;
        let mut buffer = [0u8; N];
        buffer.copy_from_slice(bytes);
        self.position = end;
        Ok(buffer)
    }
}

impl<R: Read> PrimitiveRead for BinaryRecordReader<'_, R> {
    fn read_int(&mut self) -> Result<i32> {
        Ok(self.order.i32_from_bytes(self.take::<4>()?))
    }

    fn read_float(&mut self) -> Result<f32> {
        Ok(self.order.f32_from_bytes(self.take::<4>()?))
    }

    fn read_double(&mut self) -> Result<f64> {
        Ok(self.order.f64_from_bytes(self.take::<8>()?))
    }

    fn read_string(&mut self, length: usize) -> Result<String> {
        let end = self.position + length;
        let bytes = self
            .payload
            .get(self.position..end)
            .ok_or(Error::RecordOverrun {
                declared: self.payload.len(),
                requested: end,
            })?;
        let value = ascii_string(bytes)?;
        self.position = end;
        Ok(value)
    }
}

/// Writer for one binary record, markers are added on [finish](Self::finish)
pub(crate) struct BinaryRecordWriter {
    order: ByteOrder,
    payload: Vec<u8>,
}

impl BinaryRecordWriter {
    pub(crate) fn new(order: ByteOrder) -> Self {
        Self {
            order,
            payload: Vec::new(),
        }
    }

    /// Write the framed record, returning the payload length
    pub(crate) fn finish<W: Write>(self, writer: &mut W) -> Result<usize> {
        let length = self.payload.len();
        let marker = i32::try_from(length).map_err(|_| Error::InvalidMarker(length as i64))?;
        let marker = self.order.i32_to_bytes(marker);
        writer.write_all(&marker)?;
        writer.write_all(&self.payload)?;
        writer.write_all(&marker)?;
        Ok(length)
    }
}

impl PrimitiveWrite for BinaryRecordWriter {
    fn write_int(&mut self, value: i32) {
        self.payload.extend(self.order.i32_to_bytes(value));
    }

    fn write_float(&mut self, value: f32) {
        self.payload.extend(self.order.f32_to_bytes(value));
    }

    fn write_double(&mut self, value: f64) {
        self.payload.extend(self.order.f64_to_bytes(value));
    }

    fn write_string(&mut self, padded: &str) {
        self.payload.extend(padded.as_bytes());
    }
}

/// Read a record marker, `None` on a clean end of file
fn read_marker<R: Read>(reader: &mut R, order: ByteOrder) -> Result<Option<i32>> {
    let mut buffer = [0u8; 4];
    let mut filled = 0;
    while filled < buffer.len() {
        match reader.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    match filled {
        0 => Ok(None),
        4 => Ok(Some(order.i32_from_bytes(buffer))),
        _ => Err(Error::TruncatedRecord { declared: 0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn framed(payload: &[u8]) -> Vec<u8> {
        let n = (payload.len() as i32).to_ne_bytes();
        [&n[..], payload, &n[..]].concat()
    }

    #[test]
    fn write_then_read() {
        let mut record = BinaryRecordWriter::new(ByteOrder::Native);
        record.write_int(-7);
        record.write_float(1.5);
        record.write_double(2.25e-300);
        record.write_string("U235    ");

        let mut bytes = Vec::new();
        assert_eq!(record.finish(&mut bytes).unwrap(), 24);
        assert_eq!(bytes.len(), 32);

        let mut cursor = Cursor::new(bytes);
        let mut record = BinaryRecordReader::open(&mut cursor, ByteOrder::Native).unwrap();
        assert_eq!(record.read_int().unwrap(), -7);
        assert_eq!(record.read_float().unwrap(), 1.5);
        assert_eq!(record.read_double().unwrap(), 2.25e-300);
        assert_eq!(record.read_string(8).unwrap(), "U235");
        assert_eq!(record.close().unwrap(), 24);
    }

    #[test]
    fn over_read_is_caught() {
        let mut cursor = Cursor::new(framed(&1_i32.to_ne_bytes()));
        let mut record = BinaryRecordReader::open(&mut cursor, ByteOrder::Native).unwrap();
        record.read_int().unwrap();
        assert!(matches!(
            record.read_int(),
            Err(Error::RecordOverrun {
                declared: 4,
                requested: 8
            })
        ));
    }

    #[test]
    fn under_read_is_caught() {
        let payload = [1_i32.to_ne_bytes(), 2_i32.to_ne_bytes()].concat();
        let mut cursor = Cursor::new(framed(&payload));
        let mut record = BinaryRecordReader::open(&mut cursor, ByteOrder::Native).unwrap();
        record.read_int().unwrap();
        assert!(matches!(
            record.close(),
            Err(Error::RecordUnderrun {
                declared: 8,
                consumed: 4
            })
        ));
    }

    #[test]
    fn missing_trailing_marker() {
        let mut bytes = framed(&3_i32.to_ne_bytes());
        bytes.truncate(8);
        let mut cursor = Cursor::new(bytes);
        let mut record = BinaryRecordReader::open(&mut cursor, ByteOrder::Native).unwrap();
        record.read_int().unwrap();
        assert!(matches!(
            record.close(),
            Err(Error::TruncatedRecord { declared: 4 })
        ));
    }

    #[test]
    fn negative_marker() {
        let mut cursor = Cursor::new((-4_i32).to_ne_bytes().to_vec());
        assert!(matches!(
            BinaryRecordReader::open(&mut cursor, ByteOrder::Native),
            Err(Error::InvalidMarker(-4))
        ));
    }
}
