//! Shorthand constructors for attributes built from arbitrary values.
//!
//! ```
//! use attrtree::attr;
//! use std::collections::BTreeMap;
//!
//! let ports = BTreeMap::from([("http", 80), ("https", 443)]);
//! let a = attr::map("ports", &ports);
//! assert_eq!(a.to_string(), "ports=[http=80 https=443]");
//! ```

use serde::Serialize;

use crate::value::{Attr, Value};

/// An attribute holding the normalized form of `value`.
pub fn any<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Attr {
    Attr::new(key, crate::normalize(value))
}

/// An attribute holding `<nil>` for `None`, else the normalized pointee.
pub fn pointer<T: Serialize + ?Sized>(key: impl Into<String>, value: Option<&T>) -> Attr {
    match value {
        Some(v) => any(key, v),
        None => Attr::new(key, Value::nil()),
    }
}

/// An attribute grouping every map entry.
pub fn map<I, K, V>(key: impl Into<String>, entries: I) -> Attr
where
    I: IntoIterator<Item = (K, V)>,
    K: Serialize,
    V: Serialize,
{
    Attr::new(key, crate::map_value(entries))
}

/// An attribute grouping sequence elements by index.
///
/// With `unpack_single`, a one-element sequence is logged as the bare element.
/// A `None` sequence is logged as `<nil>`.
pub fn slice<T: Serialize + ?Sized>(
    key: impl Into<String>,
    items: &T,
    unpack_single: bool,
) -> Attr {
    Attr::new(key, crate::seq_value(items, unpack_single))
}
