//! Wiring between byte sources, the engines and outputs.
//!
//! - [`split_reader`] / [`split_file`]: read CSV in chunks, parse it and
//!   distribute the rows over numbered outputs via a [`Splitter`].
//! - [`parse_reader`] / [`parse_file`]: parse CSV and write every row as one
//!   JSON object per line.
//!
//! The `*_reader` functions return the crate's typed [`CsvStreamError`]; the
//! `*_file` wrappers add path context with `anyhow`.

mod files;
mod source;

pub use files::{FileSinks, OutputNaming, output_name};
pub use source::{ChunkReader, StopSignal};

use crate::engine::{ParseEngine, ParseEvent};
use crate::error::{CsvStreamError, Result};
use crate::options::{CsvOptions, SplitConfig};
use crate::policy::SplitPolicy;
use crate::row::Row;
use crate::splitter::{SinkProvider, SplitReport, Splitter};
use crate::stats::Stats;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// Split CSV read from `reader` into outputs opened through `provider`.
///
/// Returns the report and the provider, so in-memory providers can hand
/// back what was written.
///
/// # Errors
/// Configuration errors from [`SplitPolicy::from_config`], any parse or
/// split error, read errors, and [`CsvStreamError::Cancelled`] when `stop`
/// is raised. The open output is closed before returning an error.
pub fn split_reader<R, P>(
    reader: R,
    config: &SplitConfig,
    provider: P,
    stop: &StopSignal,
) -> Result<(SplitReport, P)>
where
    R: Read,
    P: SinkProvider,
{
    let policy = SplitPolicy::from_config(config)?;
    tracing::debug!(?policy, options = ?config.csv, "starting split");
    let mut splitter = Splitter::new(policy, config.csv, provider);
    let mut engine = ParseEngine::new(config.csv);
    let mut chunks = ChunkReader::new(reader, config.chunk_size);

    let pumped = pump(&mut chunks, &mut engine, stop, |row, stats| {
        splitter.accept(&row, stats)
    });
    if let Err(e) = pumped {
        splitter.abort();
        return Err(e);
    }
    let report = splitter.finish()?;
    Ok((report, splitter.into_provider()))
}

/// Split the file at `input` into `out_dir`, naming outputs after the input
/// (see [`OutputNaming::from_input`]).
///
/// # Errors
/// See [`split_reader`]; errors are annotated with the input path.
pub fn split_file(
    input: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    config: &SplitConfig,
    with_extension: bool,
    stop: &StopSignal,
) -> anyhow::Result<SplitReport> {
    let input = input.as_ref();
    let naming = OutputNaming::from_input(input, with_extension)?;
    let sinks = FileSinks::new(out_dir.as_ref(), naming)?;
    let f = File::open(input).with_context(|| format!("open {}", input.display()))?;
    let (report, _) = split_reader(f, config, sinks, stop)
        .with_context(|| format!("split {}", input.display()))?;
    Ok(report)
}

/// Parse CSV from `reader` and write each row to `out` as a JSON object on
/// its own line, keys in source order. Returns the final totals.
///
/// # Errors
/// Any parse error, read or write errors, and [`CsvStreamError::Cancelled`].
pub fn parse_reader<R: Read, W: Write>(
    reader: R,
    mut out: W,
    options: CsvOptions,
    chunk_size: usize,
    stop: &StopSignal,
) -> Result<Stats> {
    let mut engine = ParseEngine::new(options);
    let mut chunks = ChunkReader::new(reader, chunk_size);
    let total = pump(&mut chunks, &mut engine, stop, |row, _| {
        serde_json::to_writer(&mut out, &row).map_err(std::io::Error::from)?;
        out.write_all(b"\n")?;
        Ok(())
    })?;
    out.flush()?;
    Ok(total)
}

/// [`parse_reader`] over the file at `input`.
///
/// # Errors
/// See [`parse_reader`]; errors are annotated with the input path.
pub fn parse_file<W: Write>(
    input: impl AsRef<Path>,
    out: W,
    options: CsvOptions,
    stop: &StopSignal,
) -> anyhow::Result<Stats> {
    let input = input.as_ref();
    let f = File::open(input).with_context(|| format!("open {}", input.display()))?;
    parse_reader(
        f,
        BufWriter::new(out),
        options,
        crate::options::DEFAULT_CHUNK_SIZE,
        stop,
    )
    .with_context(|| format!("parse {}", input.display()))
}

/// Drive `engine` over every chunk, handing each row to `on_row`, and return
/// the final total.
fn pump<R, F>(
    chunks: &mut ChunkReader<R>,
    engine: &mut ParseEngine,
    stop: &StopSignal,
    mut on_row: F,
) -> Result<Stats>
where
    R: Read,
    F: FnMut(Row, Stats) -> Result<()>,
{
    let mut dispatch = |events: Vec<ParseEvent>| -> Result<Option<Stats>> {
        let mut total = None;
        for event in events {
            match event {
                ParseEvent::Row(parsed) => {
                    if stop.is_raised() {
                        return Err(CsvStreamError::Cancelled);
                    }
                    on_row(parsed.row, parsed.stats)?;
                }
                ParseEvent::Total(stats) => total = Some(stats),
            }
        }
        Ok(total)
    };

    loop {
        if stop.is_raised() {
            return Err(CsvStreamError::Cancelled);
        }
        let Some(chunk) = chunks.next_chunk()? else {
            break;
        };
        dispatch(engine.feed(chunk)?)?;
    }
    let total = dispatch(engine.finish()?)?;
    Ok(total.unwrap_or_else(|| engine.stats()))
}
