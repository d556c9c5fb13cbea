//! Testing utilities for code built on csv-streamy.
//!
//! - **Mock I/O**: [`MemorySinks`] collects split outputs in memory
//! - **Chunking**: [`partition`] and [`byte_at_a_time`] cut text into chunks
//!   to exercise chunk-boundary handling
//! - **Assertions**: [`assert_rows_equal`], [`assert_chunk_independent`]
//! - **Builders**: [`CsvTextBuilder`] writes CSV text for test inputs
//! - **Fixtures**: small CSV documents covering header, quote and malformed
//!   variants
//!
//! # Quick Start
//!
//! ```
//! use csv_streamy::testing::*;
//! use csv_streamy::{CsvOptions, Row};
//!
//! let text = CsvTextBuilder::new()
//!     .headers(["id", "name"])
//!     .row(["1", "Alice"])
//!     .build();
//! let rows = parse_in_chunks(&text, 3, CsvOptions::new().with_headers(true))?;
//! assert_rows_equal(&rows, &[Row::from([("id", "1"), ("name", "Alice")])]);
//! # Ok::<(), csv_streamy::CsvStreamError>(())
//! ```

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod mock_io;

pub use assertions::*;
pub use builders::*;
pub use fixtures::*;
pub use mock_io::*;
