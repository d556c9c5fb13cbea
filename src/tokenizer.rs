//! Quote-aware splitting of text into logical lines and of lines into fields.
//!
//! Both splitters are stateless: they only look at the text they are handed.
//! The [`ParseEngine`](crate::ParseEngine) re-runs them over its carry buffer
//! after every chunk, so a scan never depends on anything before the start of
//! the current logical line.
//!
//! # Quote handling
//!
//! With quoting enabled a newline ends the current line when the line so far
//! is at least three characters long and ends with `"`, whatever precedes
//! that quote. A comma ends a field only after a closing `"`, and there a
//! quote counts as escaped, and therefore not closing, when the single
//! character right before it is a `\` or another `"`. Only that one
//! character is inspected; runs of escape characters are not counted.
//!
//! Field values keep their interior escape sequences verbatim: `"a""b"`
//! yields `a""b`, and `"a\"b"` yields `a\"b`. Only the one wrapping pair of
//! quotes is removed.

use crate::error::{CsvStreamError, Result};

const QUOTE: char = '"';
const DELIMITER: char = ',';
const NEWLINE: char = '\n';

/// Shortest quoted line that may be terminated: an opening quote, one
/// character and the closing quote.
const MIN_QUOTED_LINE: usize = 3;

fn is_escape(c: char) -> bool {
    c == QUOTE || c == '\\'
}

/// Length and last two characters of the span scanned so far.
#[derive(Debug, Default)]
struct SpanTail {
    len: usize,
    last: Option<char>,
    before_last: Option<char>,
}

impl SpanTail {
    fn push(&mut self, c: char) {
        self.len += 1;
        self.before_last = self.last;
        self.last = Some(c);
    }

    /// The span ends with a quote that is not preceded by an escape character.
    fn ends_with_closing_quote(&self) -> bool {
        self.last == Some(QUOTE) && !self.before_last.is_some_and(is_escape)
    }

    /// The span is a complete quoted field. `""` is the empty field: its
    /// closing quote is preceded by the opening quote, not by an escape.
    fn closes_field(&self) -> bool {
        match self.len {
            0 | 1 => false,
            2 => self.last == Some(QUOTE),
            _ => self.ends_with_closing_quote(),
        }
    }
}

/// Lazy iterator over logical lines, see [`split_lines`].
///
/// Like `str::split`, the final segment is always yielded, possibly empty.
/// It is whatever followed the last terminating newline and may be an
/// incomplete line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: Option<&'a str>,
    quoted: bool,
}

impl<'a> Lines<'a> {
    /// Iterate over the lines of `text` without trimming leading blanks.
    #[must_use]
    pub fn new(text: &'a str, quoted: bool) -> Self {
        Self {
            rest: Some(text),
            quoted,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest?;
        match line_end(rest, self.quoted) {
            Some(at) => {
                self.rest = Some(&rest[at + NEWLINE.len_utf8()..]);
                Some(&rest[..at])
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }
}

/// Byte offset of the newline that terminates the first line of `text`.
fn line_end(text: &str, quoted: bool) -> Option<usize> {
    if !quoted {
        return text.find(NEWLINE);
    }
    let mut tail = SpanTail::default();
    for (at, c) in text.char_indices() {
        if c == NEWLINE && tail.len >= MIN_QUOTED_LINE && tail.last == Some(QUOTE) {
            return Some(at);
        }
        tail.push(c);
    }
    None
}

/// Split `text` into logical lines, without their terminating newline.
///
/// Leading blank content is trimmed first, so a leading newline does not
/// produce an empty first line. With `quoted` set, newlines inside a quoted
/// span belong to the line.
///
/// ```
/// use csv_streamy::split_lines;
///
/// let lines: Vec<_> = split_lines("\na,b\nc,d", false).collect();
/// assert_eq!(lines, ["a,b", "c,d"]);
///
/// let lines: Vec<_> = split_lines("\"a\",\"b\nc\"\n", true).collect();
/// assert_eq!(lines, ["\"a\",\"b\nc\"", ""]);
/// ```
#[must_use]
pub fn split_lines(text: &str, quoted: bool) -> Lines<'_> {
    Lines::new(text.trim_start(), quoted)
}

/// Lazy iterator over the fields of one logical line, see [`split_fields`].
///
/// After the first error the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    rest: Option<&'a str>,
    quoted: bool,
}

impl<'a> Fields<'a> {
    #[must_use]
    pub fn new(line: &'a str, quoted: bool) -> Self {
        Self {
            rest: Some(line),
            quoted,
        }
    }

    fn next_quoted(&mut self, rest: &'a str) -> Result<&'a str> {
        let (raw, remainder) = match quoted_field_end(rest)? {
            Some(at) => (&rest[..at], Some(&rest[at + DELIMITER.len_utf8()..])),
            None => (rest, None),
        };
        let value = unquote(raw)?;
        self.rest = remainder;
        Ok(value)
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = Result<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest.take()?;
        if self.quoted {
            return Some(self.next_quoted(rest));
        }
        match rest.find(DELIMITER) {
            Some(at) => {
                self.rest = Some(&rest[at + DELIMITER.len_utf8()..]);
                Some(Ok(&rest[..at]))
            }
            None => Some(Ok(rest)),
        }
    }
}

/// Byte offset of the delimiter closing the first quoted field of `text`.
fn quoted_field_end(text: &str) -> Result<Option<usize>> {
    let mut tail = SpanTail::default();
    for (at, c) in text.char_indices() {
        if tail.len == 0 && c != QUOTE {
            return Err(not_opened(text));
        }
        if c == DELIMITER && tail.closes_field() {
            return Ok(Some(at));
        }
        tail.push(c);
    }
    Ok(None)
}

/// Strip the one wrapping pair of quotes from a raw quoted field.
fn unquote(raw: &str) -> Result<&str> {
    let Some(inner) = raw.strip_prefix(QUOTE) else {
        return Err(not_opened(raw));
    };
    let mut tail = SpanTail::default();
    raw.chars().for_each(|c| tail.push(c));
    if tail.last != Some(QUOTE) || tail.len < 2 {
        return Err(CsvStreamError::InvalidCsvFormat(format!(
            "final character is not a double-quote: {raw}"
        )));
    }
    if !tail.closes_field() {
        return Err(CsvStreamError::InvalidCsvFormat(format!(
            "closing double-quote is escaped: {raw}"
        )));
    }
    Ok(&inner[..inner.len() - QUOTE.len_utf8()])
}

fn not_opened(raw: &str) -> CsvStreamError {
    CsvStreamError::InvalidCsvFormat(format!("first character is not a double-quote: {raw}"))
}

/// Split one logical line into field values.
///
/// Without quoting the line is split on every `,`. With quoting every field
/// must be wrapped in `"`; otherwise this fails with
/// [`CsvStreamError::InvalidCsvFormat`].
///
/// ```
/// use csv_streamy::split_fields;
///
/// assert_eq!(split_fields("a,b", false)?, ["a", "b"]);
/// assert_eq!(split_fields(r#""a,1","b""c""#, true)?, ["a,1", r#"b""c"#]);
/// assert!(split_fields(r#""a",b"#, true).is_err());
/// # Ok::<(), csv_streamy::CsvStreamError>(())
/// ```
pub fn split_fields(line: &str, quoted: bool) -> Result<Vec<String>> {
    Fields::new(line, quoted)
        .map(|field| field.map(str::to_owned))
        .collect()
}
