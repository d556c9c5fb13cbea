//! Small CSV documents covering the header/quote combinations and the
//! malformed inputs the parser must reject.

use crate::options::CsvOptions;

/// What parsing a fixture should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// This many data rows.
    Rows(usize),
    /// [`CsvStreamError::InvalidNumberOfFields`](crate::CsvStreamError::InvalidNumberOfFields).
    FieldCountError,
    /// [`CsvStreamError::InvalidCsvFormat`](crate::CsvStreamError::InvalidCsvFormat).
    FormatError,
}

/// A named CSV document with the options to parse it and the expected outcome.
#[derive(Debug, Clone, Copy)]
pub struct CsvFixture {
    pub name: &'static str,
    pub text: &'static str,
    pub options: CsvOptions,
    pub expected: Expected,
}

const PLAIN: CsvOptions = CsvOptions {
    has_headers: false,
    has_double_quotes: false,
};
const HEADERS: CsvOptions = CsvOptions {
    has_headers: true,
    has_double_quotes: false,
};
const QUOTES: CsvOptions = CsvOptions {
    has_headers: false,
    has_double_quotes: true,
};
const HEADERS_QUOTES: CsvOptions = CsvOptions {
    has_headers: true,
    has_double_quotes: true,
};

/// Every fixture, well-formed ones first.
///
/// # Example
///
/// ```
/// use csv_streamy::testing::{csv_fixtures, Expected};
///
/// assert!(csv_fixtures().iter().any(|f| f.expected == Expected::FormatError));
/// ```
#[must_use]
pub fn csv_fixtures() -> Vec<CsvFixture> {
    vec![
        CsvFixture {
            name: "plain",
            text: "item[1][1],item[1][2],item[1][3]\nitem[2][1],item[2][2],item[2][3]\nitem[3][1],item[3][2],item[3][3]",
            options: PLAIN,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "plain_leading_newline",
            text: "\nitem[1][1],item[1][2]\nitem[2][1],item[2][2]\nitem[3][1],item[3][2]",
            options: PLAIN,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "plain_final_newline",
            text: "item[1][1],item[1][2]\nitem[2][1],item[2][2]\nitem[3][1],item[3][2]\n",
            options: PLAIN,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers",
            text: "header[1],header[2],header[3]\nitem[1][1],item[1][2],item[1][3]\nitem[2][1],item[2][2],item[2][3]\nitem[3][1],item[3][2],item[3][3]",
            options: HEADERS,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers_leading_newline",
            text: "\nheader[1],header[2]\nitem[1][1],item[1][2]\nitem[2][1],item[2][2]\nitem[3][1],item[3][2]",
            options: HEADERS,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers_final_newline",
            text: "header[1],header[2]\nitem[1][1],item[1][2]\nitem[2][1],item[2][2]\nitem[3][1],item[3][2]\n",
            options: HEADERS,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "quoted",
            text: "\"item[1][1]\",\"item[1][2]\"\n\"item[2][1]\",\"item[2][2]\"\n\"item[3][1]\",\"item[3][2]\"\n",
            options: QUOTES,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "quoted_field_newline",
            text: "\"item[1][1]\",\"item\n[1][2]\"\n\"item[2][1]\",\"item[2][2]\"\n\"item[3]\n[1]\",\"item[3][2]\"\n",
            options: QUOTES,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers_quoted",
            text: "\"header[1]\",\"header[2]\"\n\"item[1][1]\",\"item[1][2]\"\n\"item[2][1]\",\"item[2][2]\"\n\"item[3][1]\",\"item[3][2]\"\n",
            options: HEADERS_QUOTES,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers_quoted_header_newline",
            text: "\"header\n[1]\",\"header[2]\"\n\"item[1][1]\",\"item[1][2]\"\n\"item[2][1]\",\"item[2][2]\"\n\"item[3][1]\",\"item[3][2]\"\n",
            options: HEADERS_QUOTES,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "headers_quoted_field_newline",
            text: "\"header[1]\",\"header[2]\"\n\"item\n[1][1]\",\"item[1][2]\"\n\"item[2][1]\",\"item,[2][2]\"\n\"item[3][1]\",\"item[3]\n[2]\"\n",
            options: HEADERS_QUOTES,
            expected: Expected::Rows(3),
        },
        CsvFixture {
            name: "more_fields_than_headers",
            text: "header[1],header[2]\nitem[1][1],item[1][2]\nitem[2][1],item[2][2],item[2][3]\n",
            options: HEADERS,
            expected: Expected::FieldCountError,
        },
        CsvFixture {
            name: "fewer_fields_than_headers",
            text: "header[1],header[2],header[3]\nitem[1][1],item[1][2]\n",
            options: HEADERS,
            expected: Expected::FieldCountError,
        },
        CsvFixture {
            name: "first_character_not_quote",
            text: "\"header[1]\",\"header[2]\"\nitem[1][1]\",\"item[1][2]\"\n",
            options: HEADERS_QUOTES,
            expected: Expected::FormatError,
        },
        CsvFixture {
            name: "final_character_not_quote",
            text: "\"header[1]\",\"header[2]\"\n\"item[1][1]\",\"item[1][2]",
            options: HEADERS_QUOTES,
            expected: Expected::FormatError,
        },
    ]
}
