//! Mapping between field sequences and [`Row`]s.

use crate::error::{CsvStreamError, Result};
use crate::row::Row;

/// Build a row from parsed fields.
///
/// With `headers`, the field count must equal the header count and fields are
/// keyed by header name. Without, they are keyed `"1"`, `"2"`, ... in order.
///
/// # Errors
/// [`CsvStreamError::InvalidNumberOfFields`] on a count mismatch.
pub fn fields_to_row(fields: Vec<String>, headers: Option<&[String]>) -> Result<Row> {
    let mut row = Row::with_capacity(fields.len());
    match headers {
        Some(headers) => {
            if headers.len() != fields.len() {
                return Err(CsvStreamError::InvalidNumberOfFields {
                    expected: headers.len(),
                    actual: fields.len(),
                });
            }
            for (header, field) in headers.iter().zip(fields) {
                row.insert(header.as_str(), field);
            }
        }
        None => {
            for (index, field) in fields.into_iter().enumerate() {
                row.insert((index + 1).to_string(), field);
            }
        }
    }
    Ok(row)
}

/// Validate a freshly split header line.
///
/// # Errors
/// [`CsvStreamError::DuplicateHeader`] when a name appears twice.
pub fn headers_from_fields(fields: Vec<String>) -> Result<Vec<String>> {
    for (i, name) in fields.iter().enumerate() {
        if fields[..i].contains(name) {
            return Err(CsvStreamError::DuplicateHeader(name.clone()));
        }
    }
    Ok(fields)
}

/// Serialize field values into one line terminated by `\n`.
///
/// Values are joined by `,`; with `quoted` each one is wrapped in `"`.
/// Values are written as-is: no escaping is applied.
pub fn render_line<'a, I>(fields: I, quoted: bool) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let separator = if quoted { "\",\"" } else { "," };
    let mut line = String::new();
    if quoted {
        line.push('"');
    }
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push_str(separator);
        }
        line.push_str(field);
    }
    if quoted {
        line.push('"');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_keys_start_at_one() -> Result<()> {
        let row = fields_to_row(vec!["a".into(), "b".into()], None)?;
        assert_eq!(row.keys().collect::<Vec<_>>(), ["1", "2"]);
        Ok(())
    }

    #[test]
    fn render_line_quotes_every_value() {
        assert_eq!(render_line(["a", "b"], true), "\"a\",\"b\"\n");
        assert_eq!(render_line(["a", "b"], false), "a,b\n");
        assert_eq!(render_line(["x"], true), "\"x\"\n");
    }

    #[test]
    fn duplicate_headers_are_rejected() {
        let err = headers_from_fields(vec!["id".into(), "name".into(), "id".into()]);
        assert!(matches!(err, Err(CsvStreamError::DuplicateHeader(h)) if h == "id"));
    }
}
