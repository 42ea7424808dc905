//! File level orchestration of record reads and writes

// standard library
use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

// crate modules
use crate::codec::{
    at_end, AsciiRecordReader, AsciiRecordWriter, BinaryRecordReader, BinaryRecordWriter,
};
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::metadata::Metadata;
use crate::mode::{Direction, Encoding, Mode, Options};

// external crates
use log::{debug, info, warn};

/// A CCCC file format that can be read and written through a [Stream]
///
/// Implementations describe their record sequence exactly once in
/// [read_write](Format::read_write). The same method fills `self` when the
/// stream is reading and walks `self` when it is writing, with
/// [Stream::is_reading] used wherever the two directions have to differ (i.e.
/// assembling decoded records into the container).
pub trait Format: Default + Clone {
    /// Format name, as expected in the `HNAME` field
    const NAME: &'static str;

    /// Error type of the format, which must be able to carry record errors
    type Error: From<Error>;

    /// Run the record sequence against the stream
    fn read_write(&mut self, stream: &mut Stream) -> std::result::Result<(), Self::Error>;
}

/// Read a whole file into a new container
///
/// ```rust, no_run
/// # use cccc_record::{read_file, Encoding, Format, Options};
/// # fn example<F: Format<Error = cccc_record::Error>>() -> Result<F, F::Error> {
/// let container: F = read_file("path/to/file", Encoding::Binary, Options::new())?;
/// # Ok(container)
/// # }
/// ```
pub fn read_file<F: Format>(
    path: impl AsRef<Path>,
    encoding: Encoding,
    options: Options,
) -> std::result::Result<F, F::Error> {
    let mode = Mode::new(Direction::Read, encoding);
    let mut stream = Stream::with_options(path, mode, F::NAME, options)?;
    let mut container = F::default();
    container.read_write(&mut stream)?;
    stream.finish()?;
    Ok(container)
}

/// Write a container to a file
///
/// The record sequence runs on a copy, so `container` is never modified even
/// though [Format::read_write] takes `&mut self`.
pub fn write_file<F: Format>(
    container: &F,
    path: impl AsRef<Path>,
    encoding: Encoding,
    options: Options,
) -> std::result::Result<(), F::Error> {
    let mode = Mode::new(Direction::Write, encoding);
    let mut stream = Stream::with_options(path, mode, F::NAME, options)?;
    let mut copy = container.clone();
    copy.read_write(&mut stream)?;
    stream.finish()?;
    Ok(())
}

enum Handle {
    Reader(BufReader<File>),
    Writer(BufWriter<File>),
}

/// An open CCCC file
///
/// Owns the file handle for the duration of one read or write. The handle is
/// released when the stream is dropped, whichever way the operation ends.
pub struct Stream {
    path: PathBuf,
    format: &'static str,
    mode: Mode,
    options: Options,
    handle: Handle,
    position: usize,
}

impl std::fmt::Debug for Stream {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Stream")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("position", &self.position)
            .finish()
    }
}

impl Stream {
    /// Open `path` in the given mode with default options
    pub fn open(path: impl AsRef<Path>, mode: Mode, format: &'static str) -> Result<Self> {
        Self::with_options(path, mode, format, Options::default())
    }

    /// Open `path` from a mode tag, one of `rb`, `wb`, `ra` or `wa`
    ///
    /// The tag is checked before anything is done to the file system, so an
    /// unknown tag never creates or truncates a file.
    pub fn open_tagged(path: impl AsRef<Path>, tag: &str, format: &'static str) -> Result<Self> {
        let mode = tag.parse::<Mode>()?;
        Self::open(path, mode, format)
    }

    /// Open `path` in the given mode
    pub fn with_options(
        path: impl AsRef<Path>,
        mode: Mode,
        format: &'static str,
        options: Options,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let handle = match mode.direction() {
            Direction::Read => {
                let file = File::open(&path).map_err(|source| Error::MissingFile {
                    path: path.clone(),
                    source,
                })?;
                Handle::Reader(BufReader::new(file))
            }
            Direction::Write => Handle::Writer(BufWriter::new(File::create(&path)?)),
        };

        info!("Opened {format} file {path:?} ({mode})");
        Ok(Self {
            path,
            format,
            mode,
            options,
            handle,
            position: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> Options {
        self.options
    }

    /// Number of records processed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_reading(&self) -> bool {
        self.mode.is_reading()
    }

    /// Process one record described by `layout`
    ///
    /// When reading, every field of the layout is decoded into `metadata`
    /// (replacing previous values of the same name). When writing, every field
    /// is encoded from `metadata`, which is left untouched.
    ///
    /// Any failure is returned as [Error::Record], naming the record, its
    /// position in the file and the direction.
    pub fn record(&mut self, name: &str, layout: &Layout, metadata: &mut Metadata) -> Result<()> {
        self.record_with(name, layout, |_| Ok(Layout::new()), metadata)
    }

    /// Process one record whose trailing fields depend on its leading ones
    ///
    /// The `prefix` fields are processed first. `tail` then builds the layout
    /// of the remaining fields from `metadata`, which holds the decoded prefix
    /// when reading. Both parts share the one record frame.
    ///
    /// ```rust, no_run
    /// # use cccc_record::{Layout, Metadata, Stream};
    /// # fn example(stream: &mut Stream, metadata: &mut Metadata) -> cccc_record::Result<()> {
    /// let prefix = Layout::new().int("NVAL");
    /// stream.record_with(
    ///     "values",
    ///     &prefix,
    ///     |m| Ok(Layout::new().floats("VALUES", &[m.count("NVAL")?])),
    ///     metadata,
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn record_with<F>(
        &mut self,
        name: &str,
        prefix: &Layout,
        tail: F,
        metadata: &mut Metadata,
    ) -> Result<()>
    where
        F: FnOnce(&Metadata) -> Result<Layout>,
    {
        let position = self.position;
        let bytes = self
            .transfer(prefix, tail, metadata)
            .map_err(|source| self.context(name, position, source))?;

        debug!(
            "{} record {position} \"{name}\" ({bytes} bytes)",
            self.mode.direction()
        );
        self.position += 1;
        Ok(())
    }

    fn transfer<F>(&mut self, prefix: &Layout, tail: F, metadata: &mut Metadata) -> Result<usize>
    where
        F: FnOnce(&Metadata) -> Result<Layout>,
    {
        let order = self.options.byte_order;
        match (&mut self.handle, self.mode.encoding()) {
            (Handle::Reader(reader), Encoding::Binary) => {
                let mut record = BinaryRecordReader::open(reader, order)?;
                prefix.decode(&mut record, metadata)?;
                tail(metadata)?.decode(&mut record, metadata)?;
                record.close()
            }
            (Handle::Reader(reader), Encoding::Ascii) => {
                let mut record = AsciiRecordReader::open(reader)?;
                prefix.decode(&mut record, metadata)?;
                tail(metadata)?.decode(&mut record, metadata)?;
                record.close()
            }
            (Handle::Writer(writer), Encoding::Binary) => {
                let mut record = BinaryRecordWriter::new(order);
                prefix.encode(metadata, &mut record)?;
                tail(metadata)?.encode(metadata, &mut record)?;
                record.finish(writer)
            }
            (Handle::Writer(writer), Encoding::Ascii) => {
                let mut record = AsciiRecordWriter::new();
                prefix.encode(metadata, &mut record)?;
                tail(metadata)?.encode(metadata, &mut record)?;
                record.finish(writer)
            }
        }
    }

    fn context(&self, record: &str, position: usize, source: Error) -> Error {
        Error::Record {
            format: self.format.to_string(),
            path: self.path.clone(),
            record: record.to_string(),
            position,
            direction: self.mode.direction(),
            source: Box::new(source),
        }
    }

    /// Error for a record sequence that is inconsistent with the format
    ///
    /// The position is that of the next record, i.e. the number of records
    /// processed before the inconsistency was found.
    pub fn structural(&self, reason: impl Display) -> Error {
        Error::Structure {
            format: self.format.to_string(),
            path: self.path.clone(),
            direction: self.mode.direction(),
            position: self.position,
            reason: reason.to_string(),
        }
    }

    /// Process the file identification record common to all formats
    ///
    /// Fields are `HNAME`, `HUSE1`, `HUSE2` (`A8`) and `IVERS`. A file
    /// labelled as something other than the expected format is still read,
    /// with a warning.
    pub fn identification(&mut self, metadata: &mut Metadata) -> Result<()> {
        let layout = Layout::new()
            .string("HNAME", 8)
            .string("HUSE1", 8)
            .string("HUSE2", 8)
            .int("IVERS");
        self.record("file identification", &layout, metadata)?;

        let hname = metadata.string("HNAME").unwrap_or_default();
        if self.is_reading() && !hname.eq_ignore_ascii_case(self.format) {
            warn!(
                "{:?} is labelled \"{hname}\", reading as {} anyway",
                self.path, self.format
            );
        }
        Ok(())
    }

    /// Flush the file on write, or check nothing is left over on read
    pub fn finish(self) -> Result<()> {
        match self.handle {
            Handle::Writer(mut writer) => writer.flush()?,
            Handle::Reader(mut reader) => {
                let trailing = match self.mode.encoding() {
                    Encoding::Binary => !at_end(&mut reader)?,
                    Encoding::Ascii => {
                        let mut rest = Vec::new();
                        reader.read_to_end(&mut rest)?;
                        !rest.iter().all(u8::is_ascii_whitespace)
                    }
                };
                if trailing {
                    warn!(
                        "{:?} has data after the last {} record ({} records read)",
                        self.path, self.format, self.position
                    );
                }
            }
        }
        info!("Closed {} file {:?}", self.format, self.path);
        Ok(())
    }
}
