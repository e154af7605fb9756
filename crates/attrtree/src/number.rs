/// Render an `f64` the way keys and text output show it:
/// shortest round-tripping digits, no exponent, no trailing `.0`,
/// `-0` shown as `0`, and `NaN` / `+Inf` / `-Inf` for non-finite values.
pub(crate) fn format_f64(value: f64) -> String {
    if let Some(named) = special(value) {
        return named;
    }
    let mut buf = ryu::Buffer::new();
    expand(buf.format_finite(value.abs()), value.is_sign_negative())
}

/// Like [`format_f64`], with the shortest digits that round-trip an `f32`.
pub(crate) fn format_f32(value: f32) -> String {
    if let Some(named) = special(value as f64) {
        return named;
    }
    let mut buf = ryu::Buffer::new();
    expand(buf.format_finite(value.abs()), value.is_sign_negative())
}

fn special(value: f64) -> Option<String> {
    if value.is_nan() {
        return Some(String::from("NaN"));
    }
    if value.is_infinite() {
        return Some(String::from(if value > 0.0 { "+Inf" } else { "-Inf" }));
    }
    if value == 0.0 {
        return Some(String::from("0"));
    }
    None
}

fn expand(raw: &str, negative: bool) -> String {
    let digits = match raw.split_once(['e', 'E']) {
        Some((mantissa, exp)) => shift_point(mantissa, exp.parse().unwrap_or(0)),
        None => String::from(raw),
    };
    let digits = strip_fraction_zeros(digits);
    if negative { format!("-{digits}") } else { digits }
}

/// Moves the decimal point of `mantissa` by `exp` places, padding with zeros.
fn shift_point(mantissa: &str, exp: i32) -> String {
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all: String = [int_part, frac_part].concat();
    let point = int_part.len() as i64 + exp as i64;

    if point <= 0 {
        let zeros = (-point) as usize;
        format!("0.{}{}", "0".repeat(zeros), all)
    } else if point as usize >= all.len() {
        let zeros = point as usize - all.len();
        format!("{}{}", all, "0".repeat(zeros))
    } else {
        let (head, tail) = all.split_at(point as usize);
        format!("{head}.{tail}")
    }
}

fn strip_fraction_zeros(mut s: String) -> String {
    if s.contains('.') {
        let keep = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(keep);
    }
    s
}
