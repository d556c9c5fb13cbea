use crate::error::{CsvStreamError, Result};
use crate::options::SplitConfig;
use crate::size::parse_size;
use serde::Serialize;

/// When a [`Splitter`](crate::Splitter) rotates to a new output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SplitPolicy {
    /// Exactly this many data rows per output (the last one may hold fewer).
    Rows(u64),
    /// At most this many row bytes per output, measured on the raw parsed
    /// lines without newlines or header line.
    Bytes(u64),
}

impl SplitPolicy {
    /// # Errors
    /// [`CsvStreamError::Config`] when `rows` is zero.
    pub fn rows(rows: u64) -> Result<Self> {
        if rows == 0 {
            return Err(CsvStreamError::Config(
                "--rows must be a positive integer".to_string(),
            ));
        }
        Ok(SplitPolicy::Rows(rows))
    }

    /// # Errors
    /// [`CsvStreamError::Config`] when `bytes` is zero.
    pub fn bytes(bytes: u64) -> Result<Self> {
        if bytes == 0 {
            return Err(CsvStreamError::Config(
                "--bytes must be a positive size".to_string(),
            ));
        }
        Ok(SplitPolicy::Bytes(bytes))
    }

    /// Build the policy from a [`SplitConfig`], which must name exactly one
    /// of `rows_per_file` and `bytes_per_file`.
    ///
    /// Byte sizes larger than `u64::MAX` are clamped to it.
    ///
    /// # Errors
    /// [`CsvStreamError::Config`] when both or neither are set or the value
    /// is zero, [`CsvStreamError::NotANumber`] for a malformed byte size.
    pub fn from_config(config: &SplitConfig) -> Result<Self> {
        match (config.rows_per_file, config.bytes_per_file.as_deref()) {
            (Some(_), Some(_)) => Err(CsvStreamError::Config(
                "Only one --rows or --bytes can be specified.".to_string(),
            )),
            (None, None) => Err(CsvStreamError::Config(
                "--rows or --bytes option is required.".to_string(),
            )),
            (Some(rows), None) => Self::rows(rows),
            (None, Some(size)) => {
                let bytes = parse_size(size)?;
                Self::bytes(u64::try_from(bytes).unwrap_or(u64::MAX))
            }
        }
    }

    #[must_use]
    pub fn threshold(&self) -> u64 {
        match *self {
            SplitPolicy::Rows(n) | SplitPolicy::Bytes(n) => n,
        }
    }
}
