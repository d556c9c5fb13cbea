//! Assertion and chunking helpers for parse results.

use crate::engine::parse_chunks;
use crate::error::Result;
use crate::options::CsvOptions;
use crate::row::Row;

/// Assert that two row sequences are equal, keys and key order included.
///
/// # Panics
///
/// Panics if the sequences differ in length, or any row differs.
///
/// # Example
///
/// ```
/// use csv_streamy::Row;
/// use csv_streamy::testing::assert_rows_equal;
///
/// let rows = vec![Row::from([("1", "a")])];
/// assert_rows_equal(&rows, &[Row::from([("1", "a")])]);
/// ```
pub fn assert_rows_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row count mismatch:\n  Expected: {}\n  Actual: {}\n  Expected rows: {expected:?}\n  Actual rows: {actual:?}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let a_pairs: Vec<_> = a.iter().collect();
        let e_pairs: Vec<_> = e.iter().collect();
        assert_eq!(
            a_pairs, e_pairs,
            "Row mismatch at index {i}:\n  Expected: {e_pairs:?}\n  Actual: {a_pairs:?}"
        );
    }
}

/// Cut `text` into chunks of `size` bytes, ignoring character boundaries.
///
/// # Example
///
/// ```
/// use csv_streamy::testing::partition;
///
/// assert_eq!(partition("abcde", 2), vec![&b"ab"[..], &b"cd"[..], &b"e"[..]]);
/// ```
#[must_use]
pub fn partition(text: &str, size: usize) -> Vec<&[u8]> {
    text.as_bytes().chunks(size.max(1)).collect()
}

/// Cut `text` into one-byte chunks.
#[must_use]
pub fn byte_at_a_time(text: &str) -> Vec<&[u8]> {
    partition(text, 1)
}

/// Parse `text` fed in chunks of `size` bytes.
///
/// # Errors
///
/// Any parse error.
pub fn parse_in_chunks(text: &str, size: usize, options: CsvOptions) -> Result<Vec<Row>> {
    parse_chunks(partition(text, size), options).map(|(rows, _)| rows)
}

/// Assert that parsing `text` yields the same rows for every chunk size from
/// one byte up to the whole text.
///
/// # Panics
///
/// Panics if any chunking fails to parse or disagrees with the single-chunk
/// result.
pub fn assert_chunk_independent(text: &str, options: CsvOptions) -> Vec<Row> {
    let whole = match parse_in_chunks(text, text.len().max(1), options) {
        Ok(rows) => rows,
        Err(e) => panic!("single-chunk parse failed: {e}"),
    };
    for size in 1..text.len().max(1) {
        match parse_in_chunks(text, size, options) {
            Ok(rows) => assert_eq!(rows, whole, "chunk size {size} changed the parse result"),
            Err(e) => panic!("parse with chunk size {size} failed: {e}"),
        }
    }
    whole
}
