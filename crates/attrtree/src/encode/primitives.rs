use core::fmt::Write as _;

use chrono::SecondsFormat;

use crate::number::format_f64;
use crate::value::Scalar;

fn is_control(c: char) -> bool {
    let u = c as u32;
    u < 0x20 || u == 0x7F
}

/// Whether a text token must be quoted to stay one logfmt field.
pub fn needs_quotes(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    s.chars()
        .any(|c| c == '=' || c == '"' || c.is_whitespace() || is_control(c))
}

pub fn escape_and_quote_into(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if is_control(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

pub fn escape_and_quote(s: &str) -> String {
    let mut out = String::new();
    escape_and_quote_into(&mut out, s);
    out
}

/// Appends `s`, quoting it only when required.
pub fn push_text(out: &mut String, s: &str) {
    if needs_quotes(s) {
        escape_and_quote_into(out, s);
    } else {
        out.push_str(s);
    }
}

/// Text form of a scalar before quoting.
pub fn scalar_text(s: &Scalar) -> String {
    match s {
        Scalar::Str(s) => s.clone(),
        Scalar::I64(i) => i.to_string(),
        Scalar::U64(u) => u.to_string(),
        Scalar::F64(f) => format_f64(*f),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Duration(d) => format!("{:?}", d),
        Scalar::Time(t) => t.to_rfc3339_opts(SecondsFormat::Millis, true),
        Scalar::Any(v) => v.to_string(),
    }
}
