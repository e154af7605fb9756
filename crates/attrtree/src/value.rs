use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::number::format_f64;
use crate::ser::well_known;

/// Fixed placeholder emitted for nil and empty inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// A missing value: `None`, `()` or a nil map/sequence.
    Nil,
    /// A map with no entries.
    EmptyMap,
    /// A sequence with no elements, normalized without single-value unpacking.
    EmptySeq,
    /// A sequence with no elements, normalized with single-value unpacking.
    Blank,
    /// Nesting went past [`Options::max_depth`](crate::Options::max_depth).
    Truncated,
}

impl Sentinel {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentinel::Nil => "<nil>",
            Sentinel::EmptyMap => "{}",
            Sentinel::EmptySeq => "[]",
            Sentinel::Blank => "",
            Sentinel::Truncated => "<truncated>",
        }
    }

    /// Inverse of [`Sentinel::as_str`].
    pub fn from_marker(s: &str) -> Option<Sentinel> {
        match s {
            "<nil>" => Some(Sentinel::Nil),
            "{}" => Some(Sentinel::EmptyMap),
            "[]" => Some(Sentinel::EmptySeq),
            "" => Some(Sentinel::Blank),
            "<truncated>" => Some(Sentinel::Truncated),
            _ => None,
        }
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    /// Opaque value the sink renders natively; never decomposed further.
    Any(serde_json::Value),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => f.write_str(s),
            Scalar::I64(i) => write!(f, "{}", i),
            Scalar::U64(u) => write!(f, "{}", u),
            Scalar::F64(num) => f.write_str(&format_f64(*num)),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Duration(d) => write!(f, "{:?}", d),
            Scalar::Time(t) => f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Scalar::Any(v) => write!(f, "{}", v),
        }
    }
}

/// The normalized form of any loggable value.
///
/// Sinks convert a `Value` into their own representation by switching on the
/// three variants: emit the typed scalar, emit the group as nested fields, or
/// emit the sentinel's marker string.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Group(Vec<Attr>),
    Sentinel(Sentinel),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::Scalar(Scalar::Str(s.into()))
    }

    pub fn int64(i: i64) -> Value {
        Value::Scalar(Scalar::I64(i))
    }

    pub fn uint64(u: u64) -> Value {
        Value::Scalar(Scalar::U64(u))
    }

    pub fn float64(f: f64) -> Value {
        Value::Scalar(Scalar::F64(f))
    }

    pub fn bool(b: bool) -> Value {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn duration(d: Duration) -> Value {
        Value::Scalar(Scalar::Duration(d))
    }

    pub fn time(t: DateTime<Utc>) -> Value {
        Value::Scalar(Scalar::Time(t))
    }

    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Value {
        Value::Group(attrs.into_iter().collect())
    }

    pub fn opaque(v: serde_json::Value) -> Value {
        Value::Scalar(Scalar::Any(v))
    }

    pub const fn nil() -> Value {
        Value::Sentinel(Sentinel::Nil)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Value::Group(attrs) => Some(attrs),
            _ => None,
        }
    }

    pub fn as_sentinel(&self) -> Option<Sentinel> {
        match self {
            Value::Sentinel(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up the first group member named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_group()?
            .iter()
            .find(|a| a.key == key)
            .map(|a| &a.value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => s.fmt(f),
            Value::Sentinel(s) => s.fmt(f),
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, a) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    a.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Value {
                    Value::Scalar(Scalar::$variant(v as $target))
                }
            }
        )*
    };
}

value_from! {
    i8 => I64 as i64,
    i16 => I64 as i64,
    i32 => I64 as i64,
    i64 => I64 as i64,
    isize => I64 as i64,
    u8 => U64 as u64,
    u16 => U64 as u64,
    u32 => U64 as u64,
    u64 => U64 as u64,
    usize => U64 as u64,
    f32 => F64 as f64,
    f64 => F64 as f64,
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::string(s)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Value {
        Value::duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Value {
        Value::time(t)
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Value {
        Value::Scalar(s)
    }
}

impl From<Sentinel> for Value {
    fn from(s: Sentinel) -> Value {
        Value::Sentinel(s)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Value {
        Value::Group(attrs)
    }
}

/// A key/value pair, the unit a logging record carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Attr {
        Attr {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, s: impl Into<String>) -> Attr {
        Attr::new(key, Value::string(s))
    }

    pub fn int64(key: impl Into<String>, i: i64) -> Attr {
        Attr::new(key, Value::int64(i))
    }

    pub fn uint64(key: impl Into<String>, u: u64) -> Attr {
        Attr::new(key, Value::uint64(u))
    }

    pub fn float64(key: impl Into<String>, f: f64) -> Attr {
        Attr::new(key, Value::float64(f))
    }

    pub fn bool(key: impl Into<String>, b: bool) -> Attr {
        Attr::new(key, Value::bool(b))
    }

    pub fn duration(key: impl Into<String>, d: Duration) -> Attr {
        Attr::new(key, Value::duration(d))
    }

    pub fn time(key: impl Into<String>, t: DateTime<Utc>) -> Attr {
        Attr::new(key, Value::time(t))
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Attr {
        Attr::new(key, Value::group(attrs))
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

// Serialization. Every node is wrapped in a private newtype marker so that a
// `Value` nested inside user data comes back out of the normalizer unchanged.
// Other serializers treat newtype structs as transparent and see plain data.

impl Serialize for Sentinel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(well_known::SENTINEL_TOKEN, self.as_str())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Str(s) => serializer.serialize_str(s),
            Scalar::I64(i) => serializer.serialize_i64(*i),
            Scalar::U64(u) => serializer.serialize_u64(*u),
            Scalar::F64(num) => serializer.serialize_f64(*num),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Duration(d) => {
                let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
                serializer.serialize_newtype_struct(well_known::DURATION_TOKEN, &nanos)
            }
            Scalar::Time(t) => serializer.serialize_newtype_struct(
                well_known::TIME_TOKEN,
                &t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ),
            Scalar::Any(v) => serializer.serialize_newtype_struct(well_known::OPAQUE_TOKEN, v),
        }
    }
}

struct Members<'a>(&'a [Attr]);

impl Serialize for Members<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for a in self.0 {
            map.serialize_entry(&a.key, &a.value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Scalar(s) => s.serialize(serializer),
            Value::Sentinel(s) => s.serialize(serializer),
            Value::Group(attrs) => {
                serializer.serialize_newtype_struct(well_known::GROUP_TOKEN, &Members(attrs))
            }
        }
    }
}

impl Serialize for Attr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(
            well_known::ATTR_TOKEN,
            &Members(core::slice::from_ref(self)),
        )
    }
}
