//! Named field values decoded from, or encoded to, CCCC records

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};

/// Dense array of values in wire order
///
/// Data are held exactly as they appear in the record, with the first
/// dimension of the shape being the FORTRAN-outermost (slowest varying) loop.
/// Indices passed to [Array::get] therefore run in the reverse order of the
/// FORTRAN subscripts.
///
/// For example, `((CHI(K,J),K=1,NGROUP),J=1,ICHI)` has shape `[ICHI, NGROUP]`
/// and FORTRAN `CHI(K,J)` is `chi.get(&[j, k])`.
///
/// ```rust
/// # use cccc_record::Array;
/// let chi = Array::new(vec![2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(chi.get(&[1, 0]), Some(&4));
/// assert_eq!(chi.row(1), Some(&[4, 5, 6][..]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> Array<T> {
    /// Array of the given shape, failing if the data do not fill it exactly
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self> {
        if shape.iter().product::<usize>() != data.len() {
            return Err(Error::ShapeMismatch {
                shape,
                found: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Array of the given shape with every element set to `value`
    pub fn filled(shape: Vec<usize>, value: T) -> Self
    where
        T: Clone,
    {
        let n = shape.iter().product();
        Self {
            shape,
            data: vec![value; n],
        }
    }

    /// One dimensional array
    pub fn list(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `index`, given in shape order
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0;
        for (i, n) in index.iter().zip(&self.shape) {
            if i >= n {
                return None;
            }
            flat = flat * n + i;
        }
        self.data.get(flat)
    }

    /// Contiguous slice for index `i` of the outermost dimension
    pub fn row(&self, i: usize) -> Option<&[T]> {
        let range = self.row_range(i)?;
        self.data.get(range)
    }

    pub fn row_mut(&mut self, i: usize) -> Option<&mut [T]> {
        let range = self.row_range(i)?;
        self.data.get_mut(range)
    }

    fn row_range(&self, i: usize) -> Option<std::ops::Range<usize>> {
        let (first, rest) = self.shape.split_first()?;
        if i >= *first {
            return None;
        }
        let stride = rest.iter().product::<usize>();
        Some(i * stride..(i + 1) * stride)
    }
}

/// A decoded field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i32),
    Float(f32),
    Double(f64),
    Flag(bool),
    Str(String),
    Ints(Array<i32>),
    Floats(Array<f32>),
    Doubles(Array<f64>),
    Flags(Array<bool>),
    Strs(Vec<String>),
}

impl Value {
    /// Short description of the variant for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Flag(_) => "flag",
            Self::Str(_) => "string",
            Self::Ints(_) => "int array",
            Self::Floats(_) => "float array",
            Self::Doubles(_) => "double array",
            Self::Flags(_) => "flag array",
            Self::Strs(_) => "string list",
        }
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

value_from! {
    i32 => Int,
    f32 => Float,
    f64 => Double,
    bool => Flag,
    String => Str,
    Array<i32> => Ints,
    Array<f32> => Floats,
    Array<f64> => Doubles,
    Array<bool> => Flags,
    Vec<String> => Strs,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Vec<i32>> for Value {
    fn from(value: Vec<i32>) -> Self {
        Self::Ints(Array::list(value))
    }
}

impl From<Vec<f32>> for Value {
    fn from(value: Vec<f32>) -> Self {
        Self::Floats(Array::list(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Self::Doubles(Array::list(value))
    }
}

/// Mapping of field names to values
///
/// Keys that were never set read back as `None`. This distinguishes a field
/// that is not present in a file (i.e. a conditional record that was skipped)
/// from one that is present and zero.
///
/// ```rust
/// # use cccc_record::Metadata;
/// let mut metadata = Metadata::new();
/// metadata.insert("NGROUP", 33);
/// metadata.insert("EMIN", 1.0e-5_f32);
///
/// assert_eq!(metadata.int("NGROUP"), Some(33));
/// assert_eq!(metadata.int("NISO"), None);
/// assert_eq!(metadata.float("NGROUP"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    values: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<Value>
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.values.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Move every field of `other` into this map, replacing existing keys
    pub fn extend(&mut self, other: Metadata) {
        self.values.extend(other.values);
    }

    pub fn int(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn double(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn ints(&self, key: &str) -> Option<&Array<i32>> {
        match self.get(key)? {
            Value::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn floats(&self, key: &str) -> Option<&Array<f32>> {
        match self.get(key)? {
            Value::Floats(v) => Some(v),
            _ => None,
        }
    }

    pub fn doubles(&self, key: &str) -> Option<&Array<f64>> {
        match self.get(key)? {
            Value::Doubles(v) => Some(v),
            _ => None,
        }
    }

    pub fn strings(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            Value::Strs(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn ints_mut(&mut self, key: &str) -> Option<&mut Array<i32>> {
        match self.values.get_mut(key)? {
            Value::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn floats_mut(&mut self, key: &str) -> Option<&mut Array<f32>> {
        match self.values.get_mut(key)? {
            Value::Floats(v) => Some(v),
            _ => None,
        }
    }

    /// Integer field that must be present
    pub fn require_int(&self, key: &str) -> Result<i32> {
        match self.get(key) {
            Some(Value::Int(v)) => Ok(*v),
            Some(_) => Err(type_mismatch(key, "int")),
            None => Err(Error::MissingField(key.to_string())),
        }
    }

    /// Integer field that must be present, as used to size later data
    ///
    /// ```rust
    /// # use cccc_record::Metadata;
    /// let mut metadata = Metadata::new();
    /// metadata.insert("NGROUP", 33);
    /// metadata.insert("NISO", -1);
    ///
    /// assert_eq!(metadata.count("NGROUP").unwrap(), 33);
    /// assert!(metadata.count("NISO").is_err());
    /// assert!(metadata.count("MAXUP").is_err());
    /// ```
    pub fn count(&self, key: &str) -> Result<usize> {
        let value = self.require_int(key)?;
        usize::try_from(value).map_err(|_| Error::NegativeCount {
            field: key.to_string(),
            value,
        })
    }

    /// Integer array field that must be present
    pub fn require_ints(&self, key: &str) -> Result<&Array<i32>> {
        match self.get(key) {
            Some(Value::Ints(v)) => Ok(v),
            Some(_) => Err(type_mismatch(key, "int array")),
            None => Err(Error::MissingField(key.to_string())),
        }
    }

    /// Float array field that must be present
    pub fn require_floats(&self, key: &str) -> Result<&Array<f32>> {
        match self.get(key) {
            Some(Value::Floats(v)) => Ok(v),
            Some(_) => Err(type_mismatch(key, "float array")),
            None => Err(Error::MissingField(key.to_string())),
        }
    }

    /// Float field that must be present
    pub fn require_float(&self, key: &str) -> Result<f32> {
        match self.get(key) {
            Some(Value::Float(v)) => Ok(*v),
            Some(_) => Err(type_mismatch(key, "float")),
            None => Err(Error::MissingField(key.to_string())),
        }
    }

    /// String list field that must be present
    pub fn require_strings(&self, key: &str) -> Result<&[String]> {
        match self.get(key) {
            Some(Value::Strs(v)) => Ok(v.as_slice()),
            Some(_) => Err(type_mismatch(key, "string list")),
            None => Err(Error::MissingField(key.to_string())),
        }
    }
}

fn type_mismatch(key: &str, expected: &str) -> Error {
    Error::TypeMismatch {
        field: key.to_string(),
        expected: expected.to_string(),
    }
}

impl FromIterator<(String, Value)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
