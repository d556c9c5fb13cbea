use super::{EngineCore, EngineStatus};
use crate::codec::render_line;
use crate::error::{CsvStreamError, Result};
use crate::options::CsvOptions;
use crate::row::Row;
use crate::stats::Stats;

/// Incremental serializer from rows to CSV text.
///
/// In header mode the key order of the first row becomes the header, written
/// once before that row's line; every later row must carry the same number
/// of fields.
///
/// ```
/// use csv_streamy::{ConvertEngine, CsvOptions, Row};
///
/// let mut engine = ConvertEngine::new(CsvOptions::new().with_headers(true).with_double_quotes(true));
/// let bytes = engine.convert(&Row::from([("h1", "x"), ("h2", "y")]))?;
/// assert_eq!(bytes, b"\"h1\",\"h2\"\n\"x\",\"y\"\n");
/// # Ok::<(), csv_streamy::CsvStreamError>(())
/// ```
#[derive(Debug)]
pub struct ConvertEngine {
    core: EngineCore,
}

impl ConvertEngine {
    #[must_use]
    pub fn new(options: CsvOptions) -> Self {
        Self {
            core: EngineCore::new(options),
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

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.core.headers
    }

    /// Rows converted so far and bytes emitted for them, header line included.
    #[must_use]
    pub fn stats(&self) -> Stats {
        self.core.stats
    }

    /// Serialize one row, preceded by the header line if this is the first
    /// row in header mode.
    ///
    /// # Errors
    /// [`CsvStreamError::UndefinedData`] for a row without fields and
    /// [`CsvStreamError::InvalidNumberOfFields`] when the field count differs
    /// from the header count. Both leave the engine `Failed`.
    pub fn convert(&mut self, row: &Row) -> Result<Vec<u8>> {
        self.core.begin()?;
        let result = self.convert_inner(row);
        self.core.settle(result)
    }

    /// Mark the stream complete and return the final totals.
    ///
    /// # Errors
    /// [`CsvStreamError::EngineHalted`] if the engine already failed or
    /// completed.
    pub fn finish(&mut self) -> Result<Stats> {
        self.core.begin()?;
        self.core.complete();
        Ok(self.core.stats)
    }

    fn convert_inner(&mut self, row: &Row) -> Result<Vec<u8>> {
        if row.is_empty() {
            return Err(CsvStreamError::UndefinedData("data".to_string()));
        }
        let quoted = self.core.quoted();
        let mut out = String::new();
        if self.core.headers_pending() {
            self.core.headers = row.keys().map(str::to_owned).collect();
            out.push_str(&render_line(
                self.core.headers.iter().map(String::as_str),
                quoted,
            ));
        }
        if let Some(headers) = self.core.header_slice()
            && headers.len() != row.len()
        {
            return Err(CsvStreamError::InvalidNumberOfFields {
                expected: headers.len(),
                actual: row.len(),
            });
        }
        out.push_str(&render_line(row.values(), quoted));
        self.core.stats.record(out.len());
        Ok(out.into_bytes())
    }
}

/// Serialize all `rows` into one CSV string.
///
/// # Errors
/// See [`ConvertEngine::convert`].
pub fn convert_rows<'a, I>(rows: I, options: CsvOptions) -> Result<String>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut engine = ConvertEngine::new(options);
    let mut out = Vec::new();
    for row in rows {
        out.extend(engine.convert(row)?);
    }
    engine.finish()?;
    String::from_utf8(out).map_err(|e| CsvStreamError::InvalidEncoding {
        offset: e.utf8_error().valid_up_to() as u64,
    })
}
