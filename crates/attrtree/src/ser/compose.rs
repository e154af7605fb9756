//! Final assembly of map and sequence groups.

use crate::options::MapOrder;
use crate::value::{Attr, Sentinel, Value};

/// Builds the value of a sequence from its already normalized elements.
///
/// With `unpack_single`, an empty sequence becomes `""` and a single element
/// stands for itself; otherwise elements are keyed by their decimal index.
pub(crate) fn finish_seq(mut elems: Vec<Value>, unpack_single: bool) -> Value {
    match elems.len() {
        0 if unpack_single => Value::Sentinel(Sentinel::Blank),
        0 => Value::Sentinel(Sentinel::EmptySeq),
        1 if unpack_single => elems.pop().unwrap_or(Value::nil()),
        _ => Value::Group(
            elems
                .into_iter()
                .enumerate()
                .map(|(pos, value)| Attr {
                    key: pos.to_string(),
                    value,
                })
                .collect(),
        ),
    }
}

/// Builds the value of a map from its normalized entries.
pub(crate) fn finish_map(mut entries: Vec<Attr>, order: MapOrder) -> Value {
    if entries.is_empty() {
        return Value::Sentinel(Sentinel::EmptyMap);
    }
    if order == MapOrder::ByKey {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
    }
    Value::Group(entries)
}

/// Merges elements that were each a single pre-built attribute into one group.
pub(crate) fn splice_attrs(elems: Vec<Value>) -> Value {
    let mut out = Vec::with_capacity(elems.len());
    for elem in elems {
        match elem {
            Value::Group(attrs) => out.extend(attrs),
            other => out.push(Attr {
                key: out.len().to_string(),
                value: other,
            }),
        }
    }
    Value::Group(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_policy_edges() {
        assert_eq!(finish_seq(vec![], true), Value::Sentinel(Sentinel::Blank));
        assert_eq!(finish_seq(vec![], false), Value::Sentinel(Sentinel::EmptySeq));
        assert_eq!(finish_seq(vec![Value::int64(1)], true), Value::int64(1));
        assert_eq!(
            finish_seq(vec![Value::int64(1)], false),
            Value::group([Attr::int64("0", 1)])
        );
    }

    #[test]
    fn map_sorting_is_opt_in() {
        let entries = vec![Attr::int64("b", 2), Attr::int64("a", 1)];
        assert_eq!(
            finish_map(entries.clone(), MapOrder::Native),
            Value::Group(entries.clone())
        );
        assert_eq!(
            finish_map(entries, MapOrder::ByKey),
            Value::group([Attr::int64("a", 1), Attr::int64("b", 2)])
        );
        assert_eq!(
            finish_map(vec![], MapOrder::ByKey),
            Value::Sentinel(Sentinel::EmptyMap)
        );
    }
}
