//! The normalization engine: a serde `Serializer` whose output is a [`Value`].

use serde::Serialize;

use crate::options::Options;
use crate::value::Value;

mod budget;
mod compose;
mod key;
mod native;
mod value_builder;
pub(crate) mod well_known;

pub use key::format_key;

use value_builder::{MapBuilder, ValueSerializer};

/// Internal error type serde requires; never escapes a public API.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct BuildError(String);

impl BuildError {
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        BuildError(msg.into())
    }
}

impl serde::ser::Error for BuildError {
    fn custom<T: core::fmt::Display>(msg: T) -> Self {
        BuildError(msg.to_string())
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError(err.to_string())
    }
}

/// Converts values into attribute trees under a fixed set of [`Options`].
///
/// All methods are total: every input yields some [`Value`].
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    options: Options,
}

impl Normalizer {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Normalizes a value of any shape.
    ///
    /// Nested sequences are unpacked when they hold a single element.
    pub fn normalize<T: Serialize + ?Sized>(&self, value: &T) -> Value {
        value_builder::build(value, ValueSerializer::new(&self.options))
    }

    /// Normalizes map entries, keys rendered with [`format_key`].
    pub fn map_value<I, K, V>(&self, entries: I) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        K: Serialize,
        V: Serialize,
    {
        self.map_value_with(entries, |k| format_key(k))
    }

    /// Normalizes map entries with a caller-supplied key formatter.
    pub fn map_value_with<I, K, V, F>(&self, entries: I, mut key_fmt: F) -> Value
    where
        I: IntoIterator<Item = (K, V)>,
        V: Serialize,
        F: FnMut(&K) -> String,
    {
        let mut map = MapBuilder::new(ValueSerializer::new(&self.options), false);
        for (k, v) in entries {
            map.insert(key_fmt(&k), &v);
        }
        map.finish()
    }

    /// Normalizes a sequence with the caller's single-value policy.
    ///
    /// `items` is any serializable sequence (slice, `Vec`, array, tuple),
    /// possibly behind pointers: `None` yields `<nil>` whatever the policy,
    /// and `Some(seq)` is the sequence itself. Values of other shapes are
    /// normalized as by [`Normalizer::normalize`].
    pub fn seq_value<T: Serialize + ?Sized>(&self, items: &T, unpack_single: bool) -> Value {
        value_builder::build(items, ValueSerializer::for_seq(&self.options, unpack_single))
    }
}
