//! In-memory outputs and temporary directories for tests.

use crate::splitter::SinkProvider;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A [`SinkProvider`] that keeps every closed output in memory.
///
/// Outputs are keyed by sequence number. It can also be told to fail when a
/// given output is opened, to exercise error paths.
#[derive(Debug, Default)]
pub struct MemorySinks {
    outputs: BTreeMap<u64, Vec<u8>>,
    opened: u64,
    fail_on_open: Option<u64>,
}

impl MemorySinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make opening output `sequence` fail with an I/O error.
    #[must_use]
    pub fn failing_on(mut self, sequence: u64) -> Self {
        self.fail_on_open = Some(sequence);
        self
    }

    /// Number of outputs opened, closed or not.
    #[must_use]
    pub fn opened(&self) -> u64 {
        self.opened
    }

    /// Number of outputs closed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Contents of output `sequence` as text, if it was closed.
    #[must_use]
    pub fn text(&self, sequence: u64) -> Option<String> {
        self.outputs
            .get(&sequence)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// All closed outputs as text, in sequence order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.outputs
            .values()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }
}

impl SinkProvider for MemorySinks {
    type Sink = Vec<u8>;

    fn open(&mut self, sequence: u64) -> io::Result<Self::Sink> {
        if self.fail_on_open == Some(sequence) {
            return Err(io::Error::other(format!("refusing to open output {sequence}")));
        }
        self.opened += 1;
        Ok(Vec::new())
    }

    fn close(&mut self, sequence: u64, sink: Self::Sink) -> io::Result<()> {
        self.outputs.insert(sequence, sink);
        Ok(())
    }
}

/// A temporary directory that is automatically deleted when dropped.
pub struct TempDirPath {
    #[allow(dead_code)]
    temp_dir: TempDir,
    path: PathBuf,
}

impl TempDirPath {
    /// Create a new temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        Ok(Self { temp_dir, path })
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory and return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.path.join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Names of the files in the directory, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    pub fn file_names(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.path)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn memory_sinks_keep_closed_outputs() -> io::Result<()> {
        let mut sinks = MemorySinks::new();
        let mut sink = sinks.open(1)?;
        sink.write_all(b"a,b\n")?;
        sinks.close(1, sink)?;
        assert_eq!(sinks.text(1).as_deref(), Some("a,b\n"));
        assert_eq!(sinks.opened(), 1);
        Ok(())
    }

    #[test]
    fn memory_sinks_can_fail_on_open() {
        let mut sinks = MemorySinks::new().failing_on(2);
        assert!(sinks.open(1).is_ok());
        assert!(sinks.open(2).is_err());
    }

    #[test]
    fn temp_dir_lists_written_files() -> io::Result<()> {
        let dir = TempDirPath::new()?;
        dir.write_file("b.csv", "x")?;
        dir.write_file("a.csv", "y")?;
        assert_eq!(dir.file_names()?, ["a.csv", "b.csv"]);
        Ok(())
    }
}
