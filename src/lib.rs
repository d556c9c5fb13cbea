//! # csv-streamy
//!
//! **Incremental CSV parsing and serialization** over byte streams that arrive
//! in arbitrary, unaligned chunks, plus **file splitting** by row count or
//! cumulative byte size.
//!
//! ## Key Features
//!
//! - **Chunk-boundary independent** - rows never depend on where chunks are cut,
//!   including cuts inside quoted fields or multi-byte characters
//! - **Quote aware** - embedded delimiters and newlines inside `"`-wrapped fields
//! - **Header mode** - first line as field names, with field-count checks
//! - **Running stats** - every parsed row carries the row count and byte total so far
//! - **Splitting** - rotate outputs every N rows or every N bytes (`10M`, `1G`, ...)
//! - **Typed errors** - every failure is a [`CsvStreamError`] value, never a panic
//!
//! ## Quick Start
//!
//! ```
//! use csv_streamy::*;
//! # fn main() -> Result<(), CsvStreamError> {
//! let options = CsvOptions::new().with_headers(true).with_double_quotes(true);
//!
//! // Parse chunk by chunk
//! let mut parser = ParseEngine::new(options);
//! let mut rows = Vec::new();
//! for chunk in ["\"h1\",\"h2\"\n\"x", "\",\"y\"\n"] {
//!     for event in parser.feed(chunk.as_bytes())? {
//!         if let ParseEvent::Row(parsed) = event {
//!             rows.push(parsed.row);
//!         }
//!     }
//! }
//! parser.finish()?;
//! assert_eq!(rows, vec![Row::from([("h1", "x"), ("h2", "y")])]);
//!
//! // And back to text
//! let text = convert_rows(&rows, options)?;
//! assert_eq!(text, "\"h1\",\"h2\"\n\"x\",\"y\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Tokenizer
//!
//! [`split_lines`] cuts text into logical lines and [`split_fields`] cuts a
//! line into field values. With quoting on, a newline or comma only ends a
//! span right after a closing quote. Interior escapes are passed through
//! untouched (`"a""b"` becomes `a""b`).
//!
//! ### Engines
//!
//! [`ParseEngine`] keeps an explicit carry buffer of the incomplete last line
//! and returns [`ParseEvent`]s: one `Row` per completed line and a single
//! `Total` from [`ParseEngine::finish`]. [`ConvertEngine`] goes the other way.
//! Both move through `Idle → Streaming → Completed | Failed`; the first error
//! is final.
//!
//! ### Splitting
//!
//! A [`Splitter`] takes `(Row, Stats)` pairs and writes them through a
//! [`SinkProvider`], rotating according to a [`SplitPolicy`]. The [`io`]
//! module wires a reader, the parser and a splitter together:
//!
//! ```no_run
//! use csv_streamy::*;
//! use csv_streamy::io::{split_file, StopSignal};
//! # fn main() -> anyhow::Result<()> {
//! let config = SplitConfig::bytes("10M").with_csv(CsvOptions::new().with_headers(true));
//! let report = split_file("sales.csv", "out", &config, true, &StopSignal::new())?;
//! println!("wrote {} files", report.files.len()); // out/sales1.csv, out/sales2.csv, ...
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`tokenizer`] - line and field splitting
//! - [`codec`] - fields ⇄ rows, rows → lines
//! - [`engine`] - parse and convert engines
//! - [`splitter`] - output rotation
//! - [`io`] - reader/file wiring and cancellation
//! - [`testing`] - in-memory sinks, chunking helpers and fixtures

pub mod codec;
pub mod engine;
pub mod error;
pub mod io;
pub mod options;
pub mod policy;
pub mod row;
pub mod size;
pub mod splitter;
pub mod stats;
pub mod testing;
pub mod tokenizer;

pub use codec::{fields_to_row, render_line};
pub use engine::{
    ConvertEngine, EngineStatus, ParseEngine, ParseEvent, ParsedRow, convert_rows, parse_chunks,
    parse_str,
};
pub use error::CsvStreamError;
pub use options::{CsvOptions, SplitConfig};
pub use policy::SplitPolicy;
pub use row::{Headers, Row};
pub use size::parse_size;
pub use splitter::{OutputSummary, SinkProvider, SplitReport, Splitter};
pub use stats::Stats;
pub use tokenizer::{Fields, Lines, split_fields, split_lines};
