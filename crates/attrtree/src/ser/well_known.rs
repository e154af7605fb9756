//! Shapes the normalizer recognizes by name before decomposing anything.
//!
//! The `*_TOKEN` names mark nodes of an already normalized [`Value`] so that
//! it passes through unchanged; the struct shapes are the serde encodings
//! of `std::time::Duration` and `std::time::SystemTime`.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::value::{Scalar, Sentinel, Value};

pub(crate) const GROUP_TOKEN: &str = "$attrtree::private::Group";
pub(crate) const ATTR_TOKEN: &str = "$attrtree::private::Attr";
pub(crate) const SENTINEL_TOKEN: &str = "$attrtree::private::Sentinel";
pub(crate) const DURATION_TOKEN: &str = "$attrtree::private::Duration";
pub(crate) const TIME_TOKEN: &str = "$attrtree::private::Time";
pub(crate) const OPAQUE_TOKEN: &str = "$attrtree::private::Opaque";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Group,
    Attr,
    Sentinel,
    Duration,
    Time,
    Opaque,
}

impl Token {
    pub(crate) fn from_name(name: &str) -> Option<Token> {
        if !name.starts_with("$attrtree::private::") {
            return None;
        }
        match name {
            GROUP_TOKEN => Some(Token::Group),
            ATTR_TOKEN => Some(Token::Attr),
            SENTINEL_TOKEN => Some(Token::Sentinel),
            DURATION_TOKEN => Some(Token::Duration),
            TIME_TOKEN => Some(Token::Time),
            OPAQUE_TOKEN => Some(Token::Opaque),
            _ => None,
        }
    }

    /// Rebuilds a leaf from the plain value its marker wrapped.
    /// Group and attribute markers are rebuilt by the map collector instead.
    pub(crate) fn restore(self, inner: Value) -> Value {
        match (self, inner) {
            (Token::Sentinel, Value::Scalar(Scalar::Str(s))) => match Sentinel::from_marker(&s) {
                Some(sentinel) => Value::Sentinel(sentinel),
                None => Value::string(s),
            },
            (Token::Duration, Value::Scalar(Scalar::U64(nanos))) => {
                Value::duration(Duration::from_nanos(nanos))
            }
            (Token::Time, Value::Scalar(Scalar::Str(s))) => {
                match DateTime::parse_from_rfc3339(&s) {
                    Ok(t) => Value::time(t.with_timezone(&Utc)),
                    Err(err) => {
                        tracing::debug!(%err, marker = %s, "unparsable time marker kept as text");
                        Value::string(s)
                    }
                }
            }
            (_, other) => other,
        }
    }
}

/// Structs from std whose serde shape is turned into a typed scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WellKnownStruct {
    Duration,
    SystemTime,
}

impl WellKnownStruct {
    pub(crate) fn detect(name: &str, len: usize) -> Option<WellKnownStruct> {
        match (name, len) {
            ("Duration", 2) => Some(WellKnownStruct::Duration),
            ("SystemTime", 2) => Some(WellKnownStruct::SystemTime),
            _ => None,
        }
    }

    /// Field holding whole seconds.
    pub(crate) fn secs_field(self) -> &'static str {
        match self {
            WellKnownStruct::Duration => "secs",
            WellKnownStruct::SystemTime => "secs_since_epoch",
        }
    }

    /// Field holding the sub-second nanoseconds.
    pub(crate) fn nanos_field(self) -> &'static str {
        match self {
            WellKnownStruct::Duration => "nanos",
            WellKnownStruct::SystemTime => "nanos_since_epoch",
        }
    }

    pub(crate) fn build(self, secs: u64, nanos: u64) -> Option<Value> {
        let nanos = u32::try_from(nanos).ok().filter(|n| *n < 1_000_000_000)?;
        let elapsed = Duration::new(secs, nanos);
        match self {
            WellKnownStruct::Duration => Some(Value::duration(elapsed)),
            WellKnownStruct::SystemTime => {
                let at: SystemTime = UNIX_EPOCH.checked_add(elapsed)?;
                Some(Value::time(DateTime::<Utc>::from(at)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_private_names_are_tokens() {
        assert_eq!(Token::from_name(GROUP_TOKEN), Some(Token::Group));
        assert_eq!(Token::from_name("Group"), None);
        assert_eq!(Token::from_name("$attrtree::private::Other"), None);
    }

    #[test]
    fn unknown_sentinel_marker_stays_text() {
        let v = Token::Sentinel.restore(Value::string("<odd>"));
        assert_eq!(v, Value::string("<odd>"));
    }

    #[test]
    fn out_of_range_nanos_are_rejected() {
        assert_eq!(WellKnownStruct::Duration.build(1, 2_000_000_000), None);
        assert_eq!(
            WellKnownStruct::Duration.build(1, 5),
            Some(Value::duration(Duration::new(1, 5)))
        );
    }
}
