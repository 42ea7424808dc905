//! Declarative description of the fields in a record
//!
//! Every record of a CCCC file is described once as a [Layout], an ordered
//! list of named [Field]s. The same layout is decoded when reading and encoded
//! when writing, so the two directions can never drift apart.

use cccc_utils::f;

use crate::codec::{fixed_string, PrimitiveRead, PrimitiveWrite};
use crate::error::{Error, Result};
use crate::metadata::{Array, Metadata, Value};

/// Primitive kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Signed 32-bit integer
    Int,
    /// Single precision float
    Float,
    /// Double precision float, two words in the legacy layout
    Double,
    /// Logical stored as a 0/1 integer
    Flag,
    /// Fixed length character field
    Str(usize),
}

impl Kind {
    /// FORTRAN-77 default typing of a variable name
    ///
    /// Names starting with any of `I`, `J`, `K`, `L`, `M`, `N` are integers,
    /// everything else is a (single precision) real. The CCCC layouts depend on
    /// this rule, so it lives here and nowhere else.
    ///
    /// ```rust
    /// # use cccc_record::Kind;
    /// assert_eq!(Kind::implicit("NGROUP"), Kind::Int);
    /// assert_eq!(Kind::implicit("ichist"), Kind::Int);
    /// assert_eq!(Kind::implicit("EMIN"), Kind::Float);
    /// assert_eq!(Kind::implicit("HNAME"), Kind::Float);
    /// ```
    pub fn implicit(name: &str) -> Self {
        match name.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('I'..='N') => Self::Int,
            _ => Self::Float,
        }
    }

    /// Number of bytes in the binary representation
    pub fn byte_width(&self) -> usize {
        match self {
            Self::Int | Self::Float | Self::Flag => 4,
            Self::Double => 8,
            Self::Str(length) => *length,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::Double => write!(f, "double"),
            Self::Flag => write!(f, "flag"),
            Self::Str(length) => write!(f, "string*{length}"),
        }
    }
}

/// One named field of a record
///
/// An empty `shape` is a scalar. Otherwise the shape lists the dimensions with
/// the FORTRAN-outermost loop first, see [Array](crate::Array).
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: Kind,
    pub shape: Vec<usize>,
}

impl Field {
    pub fn scalar<S: Into<String>>(name: S, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            shape: Vec::new(),
        }
    }

    pub fn array<S: Into<String>>(name: S, kind: Kind, shape: &[usize]) -> Self {
        Self {
            name: name.into(),
            kind,
            shape: shape.to_vec(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Number of primitive values in the field
    pub fn count(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn byte_length(&self) -> usize {
        self.count() * self.kind.byte_width()
    }

    fn describe(&self) -> String {
        match self.is_scalar() {
            true => f!("{}", self.kind),
            false => f!("{} array", self.kind),
        }
    }
}

/// Ordered list of fields in a record
///
/// ```rust
/// # use cccc_record::{Kind, Layout};
/// let layout = Layout::new()
///     .string("HNAME", 8)
///     .implicit(&["NGROUP", "EMIN"])
///     .floats("VEL", &[33]);
///
/// assert_eq!(layout.fields()[1].kind, Kind::Int);
/// assert_eq!(layout.fields()[2].kind, Kind::Float);
/// assert_eq!(layout.byte_length(), 8 + 4 + 4 + 33 * 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    fields: Vec<Field>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn int<S: Into<String>>(self, name: S) -> Self {
        self.field(Field::scalar(name, Kind::Int))
    }

    pub fn float<S: Into<String>>(self, name: S) -> Self {
        self.field(Field::scalar(name, Kind::Float))
    }

    pub fn double<S: Into<String>>(self, name: S) -> Self {
        self.field(Field::scalar(name, Kind::Double))
    }

    pub fn flag<S: Into<String>>(self, name: S) -> Self {
        self.field(Field::scalar(name, Kind::Flag))
    }

    pub fn string<S: Into<String>>(self, name: S, length: usize) -> Self {
        self.field(Field::scalar(name, Kind::Str(length)))
    }

    pub fn ints<S: Into<String>>(self, name: S, shape: &[usize]) -> Self {
        self.field(Field::array(name, Kind::Int, shape))
    }

    pub fn floats<S: Into<String>>(self, name: S, shape: &[usize]) -> Self {
        self.field(Field::array(name, Kind::Float, shape))
    }

    pub fn doubles<S: Into<String>>(self, name: S, shape: &[usize]) -> Self {
        self.field(Field::array(name, Kind::Double, shape))
    }

    /// A list of `count` fixed length strings
    pub fn strings<S: Into<String>>(self, name: S, count: usize, length: usize) -> Self {
        self.field(Field::array(name, Kind::Str(length), &[count]))
    }

    /// Scalar fields typed by the FORTRAN implicit rule, see [Kind::implicit]
    pub fn implicit(self, names: &[&str]) -> Self {
        names.iter().fold(self, |layout, name| {
            layout.field(Field::scalar(*name, Kind::implicit(name)))
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Expected payload length of the record in bytes
    pub fn byte_length(&self) -> usize {
        self.fields.iter().map(Field::byte_length).sum()
    }

    /// Read every field from the record into `metadata`
    pub(crate) fn decode<R: PrimitiveRead>(
        &self,
        record: &mut R,
        metadata: &mut Metadata,
    ) -> Result<()> {
        for field in &self.fields {
            let value = decode_field(field, record)?;
            metadata.insert(field.name.as_str(), value);
        }
        Ok(())
    }

    /// Write every field from `metadata` into the record
    pub(crate) fn encode<W: PrimitiveWrite>(
        &self,
        metadata: &Metadata,
        record: &mut W,
    ) -> Result<()> {
        for field in &self.fields {
            match metadata.get(&field.name) {
                Some(value) => encode_field(field, value, record)?,
                // an empty array may as well be left unset
                None if !field.is_scalar() && field.count() == 0 => {}
                None => return Err(Error::MissingField(field.name.clone())),
            }
        }
        Ok(())
    }
}

fn decode_field<R: PrimitiveRead>(field: &Field, record: &mut R) -> Result<Value> {
    let n = field.count();
    let shape = field.shape.clone();
    let value = match (field.kind, field.is_scalar()) {
        (Kind::Int, true) => Value::Int(record.read_int()?),
        (Kind::Float, true) => Value::Float(record.read_float()?),
        (Kind::Double, true) => Value::Double(record.read_double()?),
        (Kind::Flag, true) => Value::Flag(record.read_flag()?),
        (Kind::Str(length), true) => Value::Str(record.read_string(length)?),
        (Kind::Int, false) => {
            let data = (0..n).map(|_| record.read_int()).collect::<Result<_>>()?;
            Value::Ints(Array::new(shape, data)?)
        }
        (Kind::Float, false) => {
            let data = (0..n).map(|_| record.read_float()).collect::<Result<_>>()?;
            Value::Floats(Array::new(shape, data)?)
        }
        (Kind::Double, false) => {
            let data = (0..n).map(|_| record.read_double()).collect::<Result<_>>()?;
            Value::Doubles(Array::new(shape, data)?)
        }
        (Kind::Flag, false) => {
            let data = (0..n).map(|_| record.read_flag()).collect::<Result<_>>()?;
            Value::Flags(Array::new(shape, data)?)
        }
        (Kind::Str(length), false) => {
            let data = (0..n)
                .map(|_| record.read_string(length))
                .collect::<Result<_>>()?;
            Value::Strs(data)
        }
    };
    Ok(value)
}

fn encode_field<W: PrimitiveWrite>(field: &Field, value: &Value, record: &mut W) -> Result<()> {
    match (field.kind, field.is_scalar(), value) {
        (Kind::Int, true, Value::Int(v)) => record.write_int(*v),
        (Kind::Float, true, Value::Float(v)) => record.write_float(*v),
        (Kind::Double, true, Value::Double(v)) => record.write_double(*v),
        (Kind::Flag, true, Value::Flag(v)) => record.write_flag(*v),
        (Kind::Str(length), true, Value::Str(v)) => {
            record.write_string(&fixed_string(&field.name, v, length)?)
        }
        (Kind::Int, false, Value::Ints(a)) => {
            check_length(field, a.len())?;
            a.as_slice().iter().for_each(|v| record.write_int(*v));
        }
        (Kind::Float, false, Value::Floats(a)) => {
            check_length(field, a.len())?;
            a.as_slice().iter().for_each(|v| record.write_float(*v));
        }
        (Kind::Double, false, Value::Doubles(a)) => {
            check_length(field, a.len())?;
            a.as_slice().iter().for_each(|v| record.write_double(*v));
        }
        (Kind::Flag, false, Value::Flags(a)) => {
            check_length(field, a.len())?;
            a.as_slice().iter().for_each(|v| record.write_flag(*v));
        }
        (Kind::Str(length), false, Value::Strs(list)) => {
            check_length(field, list.len())?;
            for v in list {
                record.write_string(&fixed_string(&field.name, v, length)?);
            }
        }
        _ => {
            return Err(Error::TypeMismatch {
                field: field.name.clone(),
                expected: field.describe(),
            })
        }
    }
    Ok(())
}

fn check_length(field: &Field, found: usize) -> Result<()> {
    match found == field.count() {
        true => Ok(()),
        false => Err(Error::LengthMismatch {
            field: field.name.clone(),
            expected: field.count(),
            found,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("HNAME", Kind::Float)]
    #[case("IVERS", Kind::Int)]
    #[case("JBAND", Kind::Int)]
    #[case("KBR", Kind::Int)]
    #[case("LTOT", Kind::Int)]
    #[case("MAXUP", Kind::Int)]
    #[case("NGROUP", Kind::Int)]
    #[case("OMEGA", Kind::Float)]
    #[case("AMASS", Kind::Float)]
    #[case("ZETA", Kind::Float)]
    #[case("iso", Kind::Int)]
    #[case("nfam", Kind::Int)]
    #[case("h", Kind::Float)]
    #[case("o", Kind::Float)]
    #[case("1NAME", Kind::Float)]
    fn implicit_typing(#[case] name: &str, #[case] expected: Kind) {
        assert_eq!(Kind::implicit(name), expected);
    }

    #[test]
    fn implicit_typing_all_letters() {
        for c in 'A'..='Z' {
            let name = f!("{c}XYZ");
            let expected = match "IJKLMN".contains(c) {
                true => Kind::Int,
                false => Kind::Float,
            };
            assert_eq!(Kind::implicit(&name), expected, "{name}");
        }
    }

    #[test]
    fn field_sizes() {
        assert_eq!(Field::scalar("EMIN", Kind::Double).byte_length(), 8);
        assert_eq!(Field::array("CHI", Kind::Float, &[2, 3]).byte_length(), 24);
        assert_eq!(Field::array("HISONM", Kind::Str(8), &[4]).byte_length(), 32);
        assert!(Field::array("STRPD", Kind::Float, &[0, 33]).count() == 0);
    }
}
