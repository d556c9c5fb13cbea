//! Error taxonomy shared by the tokenizer, the engines and the splitter.
//!
//! Every failure is returned as a [`CsvStreamError`] value on the same channel
//! as data. None of them are recovered internally: an engine or splitter that
//! returns one of these moves to [`EngineStatus::Failed`] and refuses further
//! input.

use crate::engine::EngineStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvStreamError {
    /// A quoted field or line does not begin or end with a proper quote.
    #[error("Invalid CSV format: {0}")]
    InvalidCsvFormat(String),

    #[error("The number of fields must be {expected} but {actual}.")]
    InvalidNumberOfFields { expected: usize, actual: usize },

    /// Convert mode received a row without any data.
    #[error("{0} is not defined.")]
    UndefinedData(String),

    /// The first row alone is larger than the configured bytes-per-file.
    #[error("Size policy violation: the first row is {row_bytes} bytes but only {threshold} bytes are allowed per file")]
    SizePolicyViolation { threshold: u64, row_bytes: u64 },

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate header: {0}")]
    DuplicateHeader(String),

    #[error("Invalid UTF-8 sequence at byte offset {offset}")]
    InvalidEncoding { offset: u64 },

    #[error("Engine is {0} and accepts no more input")]
    EngineHalted(EngineStatus),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CsvStreamError>;
