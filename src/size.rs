//! Human-readable byte sizes such as `"512"`, `"3K"` or `"1.5M"`.

use crate::error::{CsvStreamError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Recognized suffixes; each one is the next power of 1024.
const UNITS: &str = "KMGTPEZY";

static SIZE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+)(?:\.(\d*))?|\.(\d+))([KMGTPEZY])?$").expect("valid size regex")
});

/// Parse a byte size with an optional K/M/G/T/P/E/Z/Y suffix (powers of 1024).
///
/// A fractional number is rounded up to the next integer before the unit is
/// applied, so `"1.2K"` is `2 * 1024`. Without a suffix the (rounded up)
/// number is taken as a literal byte count. `Z` and `Y` sizes do not fit in
/// a `u64`, hence the `u128` result.
///
/// Only plain decimal notation is accepted. Whitespace around the whole
/// value is ignored, but exponents (`"1e3"`), hex (`"0x10"`), signs and
/// lowercase suffixes are all rejected.
///
/// ```
/// use csv_streamy::parse_size;
///
/// assert_eq!(parse_size("39")?, 39);
/// assert_eq!(parse_size("39.1")?, 40);
/// assert_eq!(parse_size("3K")?, 3 * 1024);
/// assert!(parse_size("stuff1234K").is_err());
/// # Ok::<(), csv_streamy::CsvStreamError>(())
/// ```
///
/// # Errors
/// [`CsvStreamError::NotANumber`] for anything else, including lowercase
/// suffixes and values too large for a `u128`.
pub fn parse_size(size: &str) -> Result<u128> {
    let not_a_number = || CsvStreamError::NotANumber(size.to_string());
    let caps = SIZE_PATTERN.captures(size.trim()).ok_or_else(not_a_number)?;

    let whole: u128 = match caps.get(1) {
        Some(digits) => digits.as_str().parse().map_err(|_| not_a_number())?,
        None => 0,
    };
    let fraction = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
    let rounded_up = if fraction.bytes().any(|b| b != b'0') {
        whole.checked_add(1).ok_or_else(not_a_number)?
    } else {
        whole
    };

    let Some(unit) = caps.get(4) else {
        return Ok(rounded_up);
    };
    let exponent = UNITS.find(unit.as_str()).map_or(0, |i| i as u32 + 1);
    rounded_up
        .checked_mul(1024u128.pow(exponent))
        .ok_or_else(not_a_number)
}
