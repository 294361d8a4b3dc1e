//! Forgiving number parsing for positional arguments
//!
//! Arguments are read the way C's `atof`/`atoi` read them: leading
//! whitespace is skipped, the longest numeric prefix is used, and anything
//! unparseable becomes zero. Garbage input therefore turns into a degenerate
//! run instead of an argument error.

use std::convert::Infallible;

/// Longest leading real number in `s`, or `0.0`
pub fn leading_real(s: &str) -> f64 {
    let s = s.trim_start();
    // Covers plain numbers as well as inf / nan spellings
    if let Ok(v) = s.parse() {
        return v;
    }

    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    if let Some(word) = rest.get(..3) {
        if word.eq_ignore_ascii_case("inf") {
            return sign * f64::INFINITY;
        }
        if word.eq_ignore_ascii_case("nan") {
            return f64::NAN.copysign(sign);
        }
    }

    let end = s
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map_or(s.len(), |(i, _)| i);

    (1..=end)
        .rev()
        .find_map(|n| s[..n].parse().ok())
        .unwrap_or(0.0)
}

/// Leading optionally-signed integer in `s`, or `0` (also on overflow)
pub fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    s[..sign_len + digits].parse().unwrap_or(0)
}

/// `clap` value parser wrapping [`leading_real`]
#[allow(clippy::unnecessary_wraps)]
pub fn real_arg(s: &str) -> Result<f64, Infallible> {
    Ok(leading_real(s))
}

/// `clap` value parser for lattice sizes; negative counts collapse to zero
#[allow(clippy::unnecessary_wraps)]
pub fn count_arg(s: &str) -> Result<usize, Infallible> {
    Ok(usize::try_from(leading_int(s)).unwrap_or(0))
}
