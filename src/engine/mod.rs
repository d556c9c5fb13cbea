//! Streaming transform engines.
//!
//! Two engines share one bookkeeping core for options, headers, totals and
//! lifecycle:
//!
//! - [`ParseEngine`] turns arbitrarily-chunked bytes into [`Row`]s, each
//!   paired with the running [`Stats`], and closes with a total.
//! - [`ConvertEngine`] turns [`Row`]s back into CSV text, emitting a header
//!   line first when configured.
//!
//! Both follow the same lifecycle, see [`EngineStatus`]. Results are returned
//! from each call rather than emitted through callbacks.

mod convert;
mod parse;

pub use convert::{ConvertEngine, convert_rows};
pub use parse::{ParseEngine, parse_chunks, parse_str};

use crate::error::{CsvStreamError, Result};
use crate::options::CsvOptions;
use crate::row::{Headers, Row};
use crate::stats::Stats;
use serde::Serialize;
use std::fmt;

/// Lifecycle of one engine instance.
///
/// `Idle → Streaming → (Completed | Failed)`. `Streaming` is re-entered for
/// every chunk or row. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EngineStatus {
    Idle,
    Streaming,
    Completed,
    Failed,
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EngineStatus::Idle => "idle",
            EngineStatus::Streaming => "streaming",
            EngineStatus::Completed => "completed",
            EngineStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A row produced by [`ParseEngine`] together with the totals including it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRow {
    pub row: Row,
    pub stats: Stats,
}

/// Output of [`ParseEngine::feed`] and [`ParseEngine::finish`].
///
/// `Total` is produced exactly once, as the last event of a successful
/// `finish`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEvent {
    Row(ParsedRow),
    Total(Stats),
}

/// State shared by both engines: options, captured headers, running totals
/// and lifecycle.
#[derive(Debug)]
struct EngineCore {
    options: CsvOptions,
    headers: Headers,
    stats: Stats,
    status: EngineStatus,
}

impl EngineCore {
    fn new(options: CsvOptions) -> Self {
        Self {
            options,
            headers: Headers::new(),
            stats: Stats::default(),
            status: EngineStatus::Idle,
        }
    }

    /// Enter `Streaming`, refusing work once a terminal state is reached.
    fn begin(&mut self) -> Result<()> {
        match self.status {
            EngineStatus::Idle | EngineStatus::Streaming => {
                self.status = EngineStatus::Streaming;
                Ok(())
            }
            halted => Err(CsvStreamError::EngineHalted(halted)),
        }
    }

    /// Record the outcome of one step; any error is fatal.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.status = EngineStatus::Failed;
        }
        result
    }

    fn complete(&mut self) {
        self.status = EngineStatus::Completed;
    }

    fn quoted(&self) -> bool {
        self.options.has_double_quotes
    }

    /// Header mode is on but no header has been captured yet.
    fn headers_pending(&self) -> bool {
        self.options.has_headers && self.headers.is_empty()
    }

    fn header_slice(&self) -> Option<&[String]> {
        self.options.has_headers.then_some(self.headers.as_slice())
    }
}
