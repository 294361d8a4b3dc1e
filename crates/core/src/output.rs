//! Plain-text dose dump
//!
//! One `x y value` line per lattice point in [`DoseGrid::dump`] order,
//! followed by an empty line. Numbers use the shortest-of-fixed-or-exponent
//! form with six significant digits (the C `%g` conversion), so dumps can be
//! diffed against maps produced by other tools.

use crate::error::Result;
use crate::grid::DoseGrid;
use std::io::Write;

/// Significant digits in dumped numbers
const PRECISION: i32 = 6;

/// Format `value` like C's `%g` with six significant digits.
///
/// Trailing zeros are dropped, exponents have a sign and at least two digits
/// (`1e-05`, `1.5e+07`), and non-finite values print as `nan` / `inf`.
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target digits first; the exponent of the rounded value picks the style
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Write every lattice point of `grid` to `out`.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] if writing or flushing fails.
pub fn write_dump<W: Write>(grid: &DoseGrid<f64>, out: &mut W) -> Result<()> {
    for sample in grid.dump() {
        writeln!(
            out,
            "{} {} {}",
            format_general(sample.x),
            format_general(sample.y),
            format_general(sample.value)
        )?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
