//! Builders for CSV test inputs.

use crate::codec::render_line;
use crate::row::Row;

/// Fluent builder for CSV text.
///
/// Lines are rendered the same way [`ConvertEngine`](crate::ConvertEngine)
/// renders them, so quoting is all-or-nothing and values are not escaped.
///
/// # Example
///
/// ```
/// use csv_streamy::testing::CsvTextBuilder;
///
/// let text = CsvTextBuilder::new()
///     .quoted(true)
///     .headers(["h1", "h2"])
///     .row(["x", "y"])
///     .build();
/// assert_eq!(text, "\"h1\",\"h2\"\n\"x\",\"y\"\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CsvTextBuilder {
    quoted: bool,
    lines: Vec<Vec<String>>,
    trailing_newline: bool,
}

impl CsvTextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quoted: false,
            lines: Vec::new(),
            trailing_newline: true,
        }
    }

    /// Wrap every value in double quotes.
    #[must_use]
    pub fn quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// Add a header line. Just another line; it is not treated specially.
    #[must_use]
    pub fn headers<I, S>(self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.row(headers)
    }

    #[must_use]
    pub fn row<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.push(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Add `count` generated rows of `width` fields, e.g. `r3c1`.
    #[must_use]
    pub fn generated_rows(mut self, count: usize, width: usize) -> Self {
        for r in 1..=count {
            self.lines
                .push((1..=width).map(|c| format!("r{r}c{c}")).collect());
        }
        self
    }

    /// Drop the newline after the last line.
    #[must_use]
    pub fn without_trailing_newline(mut self) -> Self {
        self.trailing_newline = false;
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        let mut text: String = self
            .lines
            .iter()
            .map(|fields| render_line(fields.iter().map(String::as_str), self.quoted))
            .collect();
        if !self.trailing_newline && text.ends_with('\n') {
            text.pop();
        }
        text
    }
}

/// Rows keyed `"1"`, `"2"`, ... as produced when parsing without headers.
#[must_use]
pub fn positional_row<I, S>(values: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| ((i + 1).to_string(), v.into()))
        .collect()
}
