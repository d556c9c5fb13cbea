//! Configuration for the engines and for split runs.

use serde::{Deserialize, Serialize};

/// Default number of bytes read from the source per chunk (64 KiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Options recognized by both [`ParseEngine`](crate::ParseEngine) and
/// [`ConvertEngine`](crate::ConvertEngine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Treat the first logical line as the header row (parse) or emit a
    /// header line before the first row (convert).
    pub has_headers: bool,
    /// Enable quote-aware tokenization and quoted serialization.
    pub has_double_quotes: bool,
}

impl CsvOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `has_headers`.
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Sets `has_double_quotes`.
    #[must_use]
    pub fn with_double_quotes(mut self, has_double_quotes: bool) -> Self {
        self.has_double_quotes = has_double_quotes;
        self
    }
}

/// Configuration of a split run.
///
/// Exactly one of `rows_per_file` and `bytes_per_file` must be set; this is
/// checked by [`SplitPolicy::from_config`](crate::SplitPolicy::from_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Maximum data rows per output file.
    pub rows_per_file: Option<u64>,
    /// Maximum bytes per output file, e.g. `"512"`, `"3K"` or `"1.5M"`.
    pub bytes_per_file: Option<String>,
    /// Tokenization options used for both reading and writing.
    pub csv: CsvOptions,
    /// Bytes read from the input per chunk.
    pub chunk_size: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            rows_per_file: None,
            bytes_per_file: None,
            csv: CsvOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SplitConfig {
    /// A config splitting every `rows` data rows.
    #[must_use]
    pub fn rows(rows: u64) -> Self {
        Self {
            rows_per_file: Some(rows),
            ..Self::default()
        }
    }

    /// A config splitting by cumulative byte size, e.g. `SplitConfig::bytes("10M")`.
    #[must_use]
    pub fn bytes(size: impl Into<String>) -> Self {
        Self {
            bytes_per_file: Some(size.into()),
            ..Self::default()
        }
    }

    /// Sets the tokenization options.
    #[must_use]
    pub fn with_csv(mut self, csv: CsvOptions) -> Self {
        self.csv = csv;
        self
    }

    /// Sets the read chunk size (clamped to at least one byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }
}
