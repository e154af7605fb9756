#![doc = include_str!("../README.md")]

pub mod attr;
pub mod encode;
pub mod error;
pub mod options;
pub mod ser;
pub mod value;

mod number;

pub use crate::error::{Error, Result};
pub use crate::options::{MapOrder, Options};
pub use crate::ser::{Normalizer, format_key};
pub use crate::value::{Attr, Scalar, Sentinel, Value};

use serde::Serialize;

/// Normalizes a value of any shape with default [`Options`].
pub fn normalize<T: Serialize + ?Sized>(value: &T) -> Value {
    Normalizer::default().normalize(value)
}

/// Normalizes map entries into a group keyed by [`format_key`].
///
/// Empty input yields `{}`.
pub fn map_value<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Serialize,
    V: Serialize,
{
    Normalizer::default().map_value(entries)
}

/// Like [`map_value`], with a custom key formatter.
pub fn map_value_with<I, K, V, F>(entries: I, key_fmt: F) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    V: Serialize,
    F: FnMut(&K) -> String,
{
    Normalizer::default().map_value_with(entries, key_fmt)
}

/// Normalizes a sequence into a group keyed by index.
///
/// A nil sequence yields `<nil>`. Empty input yields `""` with
/// `unpack_single` and `[]` without; a single element with `unpack_single`
/// yields that element's value.
pub fn seq_value<T: Serialize + ?Sized>(items: &T, unpack_single: bool) -> Value {
    Normalizer::default().seq_value(items, unpack_single)
}
