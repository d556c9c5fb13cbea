//! Chunked reading with cooperative cancellation.

use std::io::{self, Read};
use tokio_util::sync::CancellationToken;

/// A cloneable flag asking a running parse or split to stop.
///
/// Backed by a [`CancellationToken`]; all clones share one state. The
/// drivers in [`crate::io`] check it before every chunk and before every
/// row, and a raised signal ends the run with
/// [`CsvStreamError::Cancelled`](crate::CsvStreamError::Cancelled).
#[derive(Debug, Clone, Default)]
pub struct StopSignal(CancellationToken);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.cancel();
    }

    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.0.is_cancelled()
    }

    /// The underlying token, for callers that also await it elsewhere.
    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.0
    }
}

impl From<CancellationToken> for StopSignal {
    fn from(token: CancellationToken) -> Self {
        Self(token)
    }
}

/// Reads a source in chunks of at most `chunk_size` bytes into a reused buffer.
pub struct ChunkReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            buf: vec![0; chunk_size.max(1)],
        }
    }

    /// The next non-empty chunk, or `None` at end of input.
    ///
    /// # Errors
    /// Any read error other than [`io::ErrorKind::Interrupted`].
    pub fn next_chunk(&mut self) -> io::Result<Option<&[u8]>> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(&self.buf[..n])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
