//! Integration tests for whole-file record streams

use std::path::Path;

use cccc_record::{
    read_file, write_file, ByteOrder, Direction, Encoding, Error, Format, Layout, Metadata, Mode, Options,
    Stream,
};
use rstest::rstest;

/// Minimal format with a count-dependent second record
#[derive(Debug, Clone, Default, PartialEq)]
struct Table {
    header: Metadata,
    values: Metadata,
}

impl Table {
    fn example() -> Self {
        let mut header = Metadata::new();
        header.insert("HNAME", "TABLE");
        header.insert("HUSE1", "test");
        header.insert("HUSE2", "");
        header.insert("IVERS", 1);
        header.insert("NVAL", 3);
        header.insert("LABEL", "a label");

        let mut values = Metadata::new();
        values.insert("X", vec![0.1_f32, -2.5e-12, 3.0e30]);
        values.insert("XD", vec![1.0_f64 / 3.0, -7.0e-200, 0.0]);
        values.insert("N", vec![-1, 0, i32::MAX]);

        Self { header, values }
    }
}

impl Format for Table {
    const NAME: &'static str = "TABLE";
    type Error = Error;

    fn read_write(&mut self, stream: &mut Stream) -> Result<(), Error> {
        stream.identification(&mut self.header)?;
        let layout = Layout::new().implicit(&["NVAL"]).string("LABEL", 12);
        stream.record("control", &layout, &mut self.header)?;

        let n = self
            .header
            .count("NVAL")
            .map_err(|e| stream.structural(e))?;
        let layout = Layout::new()
            .floats("X", &[n])
            .doubles("XD", &[n])
            .ints("N", &[n]);
        stream.record("values", &layout, &mut self.values)
    }
}

fn write_ints(path: &Path, values: &[i32], options: Options) {
    let mut stream = Stream::with_options(path, Mode::WriteBinary, "TEST", options).unwrap();
    let layout = Layout::new().ints("N", &[values.len()]);
    let mut metadata = Metadata::new();
    metadata.insert("N", values.to_vec());
    stream.record("ints", &layout, &mut metadata).unwrap();
    stream.finish().unwrap();
}

fn read_ints(path: &Path, n: usize, options: Options) -> Result<Vec<i32>, Error> {
    let mut stream = Stream::with_options(path, Mode::ReadBinary, "TEST", options)?;
    let mut metadata = Metadata::new();
    stream.record("ints", &Layout::new().ints("N", &[n]), &mut metadata)?;
    stream.finish()?;
    Ok(metadata.require_ints("N")?.as_slice().to_vec())
}

#[test]
fn binary_round_trip_is_exact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.bin");

    let table = Table::example();
    write_file(&table, &path, Encoding::Binary, Options::new()).unwrap();
    let back: Table = read_file(&path, Encoding::Binary, Options::new()).unwrap();

    assert_eq!(back, table);
}

#[test]
fn ascii_round_trip_is_faithful() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");

    let table = Table::example();
    write_file(&table, &path, Encoding::Ascii, Options::new()).unwrap();
    let back: Table = read_file(&path, Encoding::Ascii, Options::new()).unwrap();

    assert_eq!(back.header, table.header);
    assert_eq!(back.values.ints("N"), table.values.ints("N"));

    let x = back.values.floats("X").unwrap().as_slice();
    let expected = table.values.floats("X").unwrap().as_slice();
    for (a, b) in x.iter().zip(expected) {
        assert!((a - b).abs() <= f32::EPSILON * b.abs(), "{a} != {b}");
    }

    let xd = back.values.doubles("XD").unwrap().as_slice();
    let expected = table.values.doubles("XD").unwrap().as_slice();
    for (a, b) in xd.iter().zip(expected) {
        assert!((a - b).abs() <= 1.0e-15 * b.abs(), "{a} != {b}");
    }
}

#[test]
fn ascii_lines_have_fixed_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");
    write_file(&Table::example(), &path, Encoding::Ascii, Options::new()).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines = text.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);

    // 3 x A8 and one int, framed by two counts
    assert_eq!(lines[0].len(), 12 + 3 * 9 + 12 + 12);
    assert!(lines[0].starts_with("         +28 TABLE    test    "));

    // 3 floats, 3 doubles and 3 ints
    assert_eq!(lines[2].len(), 12 + 6 * 25 + 3 * 12 + 12);
    assert!(lines[2].starts_with("         +48  +1.0000000149011612E-01"));
}

#[test]
fn unknown_mode_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("never_created");

    let result = Stream::open_tagged(&path, "rw", "ISOTXS");
    assert!(matches!(result, Err(Error::UnknownMode(tag)) if tag == "rw"));
    assert!(!path.exists());
}

#[rstest]
#[case("rb", Mode::ReadBinary)]
#[case("wb", Mode::WriteBinary)]
#[case("ra", Mode::ReadAscii)]
#[case("wa", Mode::WriteAscii)]
fn mode_tags(#[case] tag: &str, #[case] mode: Mode) {
    assert_eq!(tag.parse::<Mode>().unwrap(), mode);
    assert_eq!(mode.tag(), tag);
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bin");
    let result = Stream::open(&path, Mode::ReadBinary, "ISOTXS");
    assert!(matches!(result, Err(Error::MissingFile { path: p, .. }) if p == path));
}

#[test]
fn missing_trailing_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.bin");
    write_ints(&path, &[1, 2, 3], Options::new());

    let mut bytes = std::fs::read(&path).unwrap();
    bytes.truncate(bytes.len() - 4);
    std::fs::write(&path, bytes).unwrap();

    let error = read_ints(&path, 3, Options::new()).unwrap_err();
    assert!(error.is_boundary());
    assert!(matches!(
        error.root_cause(),
        Error::TruncatedRecord { declared: 12 }
    ));
}

#[test]
fn missing_last_value() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.bin");
    write_ints(&path, &[1, 2, 3], Options::new());

    // last value dropped, markers left alone
    let bytes = std::fs::read(&path).unwrap();
    let cut = [&bytes[..12], &bytes[16..]].concat();
    std::fs::write(&path, cut).unwrap();

    let error = read_ints(&path, 3, Options::new()).unwrap_err();
    assert!(error.is_boundary());
}

#[test]
fn missing_last_value_with_adjusted_markers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.bin");
    write_ints(&path, &[1, 2], Options::new());

    // a consistent record, but shorter than the layout asks for
    let error = read_ints(&path, 3, Options::new()).unwrap_err();
    assert!(error.is_boundary());
    assert!(matches!(
        error.root_cause(),
        Error::RecordOverrun {
            declared: 8,
            requested: 12
        }
    ));

    // and longer than the layout asks for
    let error = read_ints(&path, 1, Options::new()).unwrap_err();
    assert!(matches!(
        error.root_cause(),
        Error::RecordUnderrun {
            declared: 8,
            consumed: 4
        }
    ));
}

#[test]
fn errors_carry_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ints.bin");
    write_ints(&path, &[1, 2], Options::new());

    match read_ints(&path, 3, Options::new()).unwrap_err() {
        Error::Record {
            format,
            record,
            position,
            ..
        } => {
            assert_eq!(format, "TEST");
            assert_eq!(record, "ints");
            assert_eq!(position, 0);
        }
        error => panic!("unexpected error {error:?}"),
    }
}

#[test]
fn big_endian_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.bin");
    let big = Options::new().with_byte_order(ByteOrder::Big);
    write_ints(&path, &[1, -2, 3], big);

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], &[0, 0, 0, 12]);
    assert_eq!(read_ints(&path, 3, big).unwrap(), vec![1, -2, 3]);

    let little = Options::new().with_byte_order(ByteOrder::Little);
    assert!(read_ints(&path, 3, little).unwrap_err().is_boundary());
}

#[test]
fn write_rejects_bad_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.bin");
    let mut stream = Stream::open(&path, Mode::WriteBinary, "TEST").unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("N", vec![1, 2]);
    metadata.insert("HNAME", "far too long for A8");

    let error = stream
        .record("ints", &Layout::new().ints("N", &[3]), &mut metadata)
        .unwrap_err();
    assert!(matches!(error.root_cause(), Error::LengthMismatch { .. }));

    let error = stream
        .record("floats", &Layout::new().floats("N", &[2]), &mut metadata)
        .unwrap_err();
    assert!(matches!(error.root_cause(), Error::TypeMismatch { .. }));

    let error = stream
        .record("missing", &Layout::new().int("NGROUP"), &mut metadata)
        .unwrap_err();
    assert!(matches!(error.root_cause(), Error::MissingField(f) if f == "NGROUP"));

    let error = stream
        .record("string", &Layout::new().string("HNAME", 8), &mut metadata)
        .unwrap_err();
    assert!(matches!(error.root_cause(), Error::LengthMismatch { .. }));

    // empty arrays may be left unset
    stream
        .record("empty", &Layout::new().floats("STRPD", &[0, 4]), &mut metadata)
        .unwrap();
    assert_eq!(stream.position(), 1);
}

#[test]
fn negative_count_is_structural() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.bin");

    let mut table = Table::example();
    table.header.insert("NVAL", -3);
    let error = write_file(&table, &path, Encoding::Binary, Options::new()).unwrap_err();
    match error {
        Error::Structure {
            format,
            direction,
            position,
            ..
        } => {
            assert_eq!(format, "TABLE");
            assert_eq!(direction, Direction::Write);
            // identification and control already written
            assert_eq!(position, 2);
        }
        error => panic!("unexpected error {error:?}"),
    }
}

#[test]
fn control_characters_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.txt");

    let mut table = Table::example();
    table.header.insert("LABEL", "two\nlines");
    let error = write_file(&table, &path, Encoding::Ascii, Options::new()).unwrap_err();
    assert!(matches!(error.root_cause(), Error::InvalidString(s) if s == "two\nlines"));

    table.header.insert("LABEL", "tab\there");
    let error = write_file(&table, &path, Encoding::Binary, Options::new()).unwrap_err();
    assert!(matches!(error.root_cause(), Error::InvalidString(_)));
}

/// Record with a length field followed by that many values
fn counted(path: &Path, mode: Mode, metadata: &mut Metadata) -> Result<(), Error> {
    let mut stream = Stream::open(path, mode, "TEST")?;
    stream.record_with(
        "counted",
        &Layout::new().implicit(&["NVAL"]),
        |m| Ok(Layout::new().floats("X", &[m.count("NVAL")?])),
        metadata,
    )?;
    stream.record("after", &Layout::new().int("END"), metadata)?;
    stream.finish()
}

#[rstest]
#[case(Mode::WriteBinary, Mode::ReadBinary, 4 + 4 * 3)]
#[case(Mode::WriteAscii, Mode::ReadAscii, 12 + 12 + 3 * 25 + 12 + 1)]
fn tail_is_sized_by_prefix(#[case] write: Mode, #[case] read: Mode, #[case] first: usize) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counted");

    let mut metadata = Metadata::new();
    metadata.insert("NVAL", 3);
    metadata.insert("X", vec![1.0_f32, 2.0, 4.0]);
    metadata.insert("END", 7);
    counted(&path, write, &mut metadata).unwrap();

    let mut back = Metadata::new();
    counted(&path, read, &mut back).unwrap();
    assert_eq!(back, metadata);

    // one frame for prefix and tail
    let bytes = std::fs::read(&path).unwrap();
    match write.encoding() {
        Encoding::Binary => {
            let marker = i32::from_ne_bytes(bytes[..4].try_into().unwrap());
            assert_eq!(marker as usize, first);
        }
        Encoding::Ascii => {
            let text = String::from_utf8(bytes).unwrap();
            assert_eq!(text.lines().next().unwrap().len() + 1, first);
            assert!(text.starts_with("         +16"));
        }
    }
}

#[test]
fn tail_failures_carry_context() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("counted");

    let mut metadata = Metadata::new();
    metadata.insert("NVAL", -1);
    let error = counted(&path, Mode::WriteBinary, &mut metadata).unwrap_err();
    assert!(matches!(
        &error,
        Error::Record { record, direction: Direction::Write, .. } if record == "counted"
    ));
    assert!(matches!(error.root_cause(), Error::NegativeCount { .. }));
}
