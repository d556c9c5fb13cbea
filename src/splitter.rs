//! Partitioning a parsed row stream across successive outputs.
//!
//! A [`Splitter`] receives `(Row, Stats)` pairs in arrival order, decides per
//! row whether to rotate to a new output according to its [`SplitPolicy`],
//! and serializes each row into the current output through a fresh
//! [`ConvertEngine`] per output, so every output gets its own header line in
//! header mode.
//!
//! Outputs are obtained from a [`SinkProvider`]. Exactly one sink is open at a
//! time: the current one is closed before the next is opened, and whatever
//! is open is closed on [`Splitter::finish`] or on the first error.

use crate::engine::{ConvertEngine, EngineStatus};
use crate::error::{CsvStreamError, Result};
use crate::options::CsvOptions;
use crate::policy::SplitPolicy;
use crate::row::Row;
use crate::stats::Stats;
use serde::Serialize;
use std::io::{self, Write};

/// Opens and closes the numbered outputs of a split run.
pub trait SinkProvider {
    type Sink: Write;

    /// Open output number `sequence`; the first output is `1`.
    fn open(&mut self, sequence: u64) -> io::Result<Self::Sink>;

    /// Flush and release a sink once the splitter is done with it.
    fn close(&mut self, _sequence: u64, mut sink: Self::Sink) -> io::Result<()> {
        sink.flush()
    }
}

/// What was written to one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    pub sequence: u64,
    /// Data rows, header line excluded.
    pub rows: u64,
    /// Bytes written, header line and newlines included.
    pub bytes: u64,
}

/// Result of a completed split run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub files: Vec<OutputSummary>,
    /// Stats of the last row accepted, i.e. the parse totals.
    pub total: Stats,
}

/// The currently open output.
struct OutputCursor<S> {
    sink: S,
    sequence: u64,
    converter: ConvertEngine,
}

pub struct Splitter<P: SinkProvider> {
    policy: SplitPolicy,
    options: CsvOptions,
    provider: P,
    cursor: Option<OutputCursor<P::Sink>>,
    next_sequence: u64,
    /// Cumulative byte amount of the previous row.
    previous_amount: u64,
    /// Row bytes accumulated since the last rotation. The row that triggers a
    /// rotation starts the new output at zero.
    running_bytes: u64,
    first_row: bool,
    last_stats: Stats,
    closed: Vec<OutputSummary>,
    status: EngineStatus,
}

impl<P: SinkProvider> Splitter<P> {
    /// `options` configures the serialization of every output.
    pub fn new(policy: SplitPolicy, options: CsvOptions, provider: P) -> Self {
        Self {
            policy,
            options,
            provider,
            cursor: None,
            next_sequence: 1,
            previous_amount: 0,
            running_bytes: 0,
            first_row: true,
            last_stats: Stats::default(),
            closed: Vec::new(),
            status: EngineStatus::Idle,
        }
    }

    #[must_use]
    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Sequence number of the open output, if any.
    #[must_use]
    pub fn current_sequence(&self) -> Option<u64> {
        self.cursor.as_ref().map(|c| c.sequence)
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn into_provider(self) -> P {
        self.provider
    }

    /// Route one row, rotating first if the policy says so.
    ///
    /// `stats` must be the running totals the parser attached to `row`.
    ///
    /// # Errors
    /// [`CsvStreamError::SizePolicyViolation`] when, in bytes mode, the first
    /// row alone exceeds the threshold (nothing is opened in that case);
    /// [`CsvStreamError::Io`] when a sink fails; conversion errors from
    /// [`ConvertEngine::convert`]. The open sink is closed and the splitter
    /// is `Failed` afterwards.
    pub fn accept(&mut self, row: &Row, stats: Stats) -> Result<()> {
        self.begin()?;
        let result = self.accept_inner(row, stats);
        if result.is_err() {
            self.abort();
        }
        result
    }

    /// Close the open output and report what was written.
    ///
    /// # Errors
    /// [`CsvStreamError::Io`] if the final close fails.
    pub fn finish(&mut self) -> Result<SplitReport> {
        self.begin()?;
        if let Err(e) = self.close_current() {
            self.abort();
            return Err(e);
        }
        self.status = EngineStatus::Completed;
        let report = SplitReport {
            files: std::mem::take(&mut self.closed),
            total: self.last_stats,
        };
        tracing::info!(
            files = report.files.len(),
            rows = report.total.count,
            bytes = report.total.amount,
            "split finished"
        );
        Ok(report)
    }

    /// Close the open sink, ignoring close errors, and stop accepting rows.
    ///
    /// Used on fatal errors and cancellation. Partial outputs are kept.
    pub fn abort(&mut self) {
        if let Some(cursor) = self.cursor.take()
            && let Err(e) = self.provider.close(cursor.sequence, cursor.sink)
        {
            tracing::warn!(sequence = cursor.sequence, error = %e, "failed to close output");
        }
        self.status = EngineStatus::Failed;
    }

    fn begin(&mut self) -> Result<()> {
        match self.status {
            EngineStatus::Idle | EngineStatus::Streaming => {
                self.status = EngineStatus::Streaming;
                Ok(())
            }
            halted => Err(CsvStreamError::EngineHalted(halted)),
        }
    }

    fn accept_inner(&mut self, row: &Row, stats: Stats) -> Result<()> {
        let row_bytes = stats.amount.saturating_sub(self.previous_amount);

        if self.first_row {
            if let SplitPolicy::Bytes(threshold) = self.policy
                && row_bytes > threshold
            {
                return Err(CsvStreamError::SizePolicyViolation {
                    threshold,
                    row_bytes,
                });
            }
            self.first_row = false;
            self.rotate()?;
            self.running_bytes = row_bytes;
        } else if self.should_rotate(stats, row_bytes) {
            self.rotate()?;
            self.running_bytes = 0;
        } else {
            self.running_bytes += row_bytes;
        }

        self.previous_amount = stats.amount;
        self.last_stats = stats;
        self.write_row(row)
    }

    fn should_rotate(&self, stats: Stats, row_bytes: u64) -> bool {
        match self.policy {
            SplitPolicy::Rows(threshold) => stats.count.saturating_sub(1) % threshold == 0,
            SplitPolicy::Bytes(threshold) => {
                if row_bytes > threshold {
                    tracing::warn!(
                        row = stats.count,
                        row_bytes,
                        threshold,
                        "row alone exceeds bytes per file"
                    );
                }
                self.running_bytes + row_bytes > threshold
            }
        }
    }

    fn rotate(&mut self) -> Result<()> {
        self.close_current()?;
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        tracing::info!(sequence, "opening output");
        let sink = self.provider.open(sequence)?;
        self.cursor = Some(OutputCursor {
            sink,
            sequence,
            converter: ConvertEngine::new(self.options),
        });
        Ok(())
    }

    fn close_current(&mut self) -> Result<()> {
        let Some(OutputCursor {
            sink,
            sequence,
            mut converter,
        }) = self.cursor.take()
        else {
            return Ok(());
        };
        let written = converter.finish()?;
        self.provider.close(sequence, sink)?;
        tracing::debug!(sequence, rows = written.count, bytes = written.amount, "closed output");
        self.closed.push(OutputSummary {
            sequence,
            rows: written.count,
            bytes: written.amount,
        });
        Ok(())
    }

    fn write_row(&mut self, row: &Row) -> Result<()> {
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(CsvStreamError::Io(io::Error::other("no output is open")));
        };
        let bytes = cursor.converter.convert(row)?;
        cursor.sink.write_all(&bytes)?;
        Ok(())
    }
}
