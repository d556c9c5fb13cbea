use super::{EngineCore, EngineStatus, ParseEvent, ParsedRow};
use crate::codec::{fields_to_row, headers_from_fields};
use crate::error::{CsvStreamError, Result};
use crate::options::CsvOptions;
use crate::row::Row;
use crate::stats::Stats;
use crate::tokenizer::{Lines, split_fields};

/// Incremental parser from CSV bytes to rows.
///
/// Bytes that do not yet form a complete logical line are kept in a carry
/// buffer and re-scanned together with the next chunk, so the rows produced
/// never depend on where the chunk boundaries fall. An incomplete UTF-8
/// sequence at the end of a chunk is carried the same way.
///
/// ```
/// use csv_streamy::{CsvOptions, ParseEngine, ParseEvent};
///
/// let mut engine = ParseEngine::new(CsvOptions::new().with_headers(true));
/// let mut rows = Vec::new();
/// for chunk in ["id,na", "me\n1,Al", "ice\n2,Bob"] {
///     for event in engine.feed(chunk.as_bytes())? {
///         if let ParseEvent::Row(parsed) = event {
///             rows.push(parsed.row);
///         }
///     }
/// }
/// let last = engine.finish()?;
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].get("name"), Some("Alice"));
/// assert_eq!(last.len(), 2); // the "2,Bob" row and the total
/// # Ok::<(), csv_streamy::CsvStreamError>(())
/// ```
#[derive(Debug)]
pub struct ParseEngine {
    core: EngineCore,
    carry: Vec<u8>,
    /// Stream offset of the first byte in `carry`.
    consumed: u64,
    /// Leading blank content is only trimmed at the start of the stream.
    seen_content: bool,
}

impl ParseEngine {
    #[must_use]
    pub fn new(options: CsvOptions) -> Self {
        Self {
            core: EngineCore::new(options),
            carry: Vec::new(),
            consumed: 0,
            seen_content: false,
        }
    }

    #[must_use]
    pub fn options(&self) -> CsvOptions {
        self.core.options
    }

    #[must_use]
    pub fn status(&self) -> EngineStatus {
        self.core.status
    }

    /// Headers captured from the first logical line, empty until then.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.core.headers
    }

    /// Totals over the rows emitted so far.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.core.stats
    }

    /// Bytes currently held back as an incomplete line.
    #[must_use]
    pub fn carried(&self) -> usize {
        self.carry.len()
    }

    /// Consume one chunk and return the rows completed by it.
    ///
    /// # Errors
    /// [`CsvStreamError::InvalidCsvFormat`], [`CsvStreamError::InvalidNumberOfFields`],
    /// [`CsvStreamError::DuplicateHeader`] or [`CsvStreamError::InvalidEncoding`].
    /// After any error the engine is `Failed` and returns
    /// [`CsvStreamError::EngineHalted`] from every later call.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<ParseEvent>> {
        self.core.begin()?;
        let result = self.feed_inner(chunk);
        self.core.settle(result)
    }

    /// Flush the carried tail as the final line and emit the total.
    ///
    /// # Errors
    /// The same as [`ParseEngine::feed`]; an incomplete UTF-8 sequence left at
    /// the end of the stream is reported as [`CsvStreamError::InvalidEncoding`].
    pub fn finish(&mut self) -> Result<Vec<ParseEvent>> {
        self.core.begin()?;
        let result = self.finish_inner();
        let result = self.core.settle(result);
        if result.is_ok() {
            self.core.complete();
        }
        result
    }

    fn feed_inner(&mut self, chunk: &[u8]) -> Result<Vec<ParseEvent>> {
        let mut buffer = std::mem::take(&mut self.carry);
        buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let carry_start = {
            let decoded = decode_prefix(&buffer, self.consumed)?;
            let text = self.skip_leading_blank(decoded);
            let mut lines = Lines::new(text, self.core.quoted()).peekable();
            let mut tail_len = 0;
            while let Some(line) = lines.next() {
                if lines.peek().is_none() {
                    tail_len = line.len();
                    break;
                }
                self.accept_line(line, &mut events)?;
            }
            decoded.len() - tail_len
        };

        buffer.drain(..carry_start);
        self.consumed += carry_start as u64;
        self.carry = buffer;
        Ok(events)
    }

    fn finish_inner(&mut self) -> Result<Vec<ParseEvent>> {
        let buffer = std::mem::take(&mut self.carry);
        let decoded = std::str::from_utf8(&buffer).map_err(|e| CsvStreamError::InvalidEncoding {
            offset: self.consumed + e.valid_up_to() as u64,
        })?;
        let line = self.skip_leading_blank(decoded);

        let mut events = Vec::new();
        self.accept_line(line, &mut events)?;
        events.push(ParseEvent::Total(self.core.stats));
        tracing::debug!(
            rows = self.core.stats.count,
            bytes = self.core.stats.amount,
            "parse stream finished"
        );
        Ok(events)
    }

    fn skip_leading_blank<'t>(&mut self, text: &'t str) -> &'t str {
        if self.seen_content {
            return text;
        }
        let trimmed = text.trim_start();
        self.seen_content = !trimmed.is_empty();
        trimmed
    }

    /// Handle one complete logical line: capture it as the header, or map it
    /// to a row.
    fn accept_line(&mut self, line: &str, events: &mut Vec<ParseEvent>) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        let fields = split_fields(line, self.core.quoted())?;
        if self.core.headers_pending() {
            self.core.headers = headers_from_fields(fields)?;
            tracing::debug!(headers = ?self.core.headers, "captured header line");
            return Ok(());
        }
        let row = fields_to_row(fields, self.core.header_slice())?;
        let stats = self.core.stats.record(line.len());
        events.push(ParseEvent::Row(ParsedRow { row, stats }));
        Ok(())
    }
}

/// The longest prefix of `bytes` that is valid UTF-8, allowing only an
/// incomplete sequence at the very end.
fn decode_prefix(bytes: &[u8], offset: u64) -> Result<&str> {
    let invalid = |valid_up_to: usize| CsvStreamError::InvalidEncoding {
        offset: offset + valid_up_to as u64,
    };
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&bytes[..e.valid_up_to()]).map_err(|e| invalid(e.valid_up_to()))
        }
        Err(e) => Err(invalid(e.valid_up_to())),
    }
}

/// Parse a sequence of chunks to completion.
///
/// Returns every row in order and the final total.
///
/// # Errors
/// See [`ParseEngine::feed`].
pub fn parse_chunks<I>(chunks: I, options: CsvOptions) -> Result<(Vec<Row>, Stats)>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut engine = ParseEngine::new(options);
    let mut rows = Vec::new();
    let mut total = Stats::default();
    let mut collect = |events: Vec<ParseEvent>| {
        for event in events {
            match event {
                ParseEvent::Row(parsed) => rows.push(parsed.row),
                ParseEvent::Total(stats) => total = stats,
            }
        }
    };
    for chunk in chunks {
        collect(engine.feed(chunk.as_ref())?);
    }
    collect(engine.finish()?);
    Ok((rows, total))
}

/// Parse a complete CSV text in one chunk.
///
/// ```
/// use csv_streamy::{CsvOptions, parse_str};
///
/// let (rows, total) = parse_str("a,b\nc,d\n", CsvOptions::default())?;
/// assert_eq!(rows[1].get("2"), Some("d"));
/// assert_eq!(total.count, 2);
/// # Ok::<(), csv_streamy::CsvStreamError>(())
/// ```
///
/// # Errors
/// See [`ParseEngine::feed`].
pub fn parse_str(text: &str, options: CsvOptions) -> Result<(Vec<Row>, Stats)> {
    parse_chunks([text], options)
}
