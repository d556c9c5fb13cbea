//! File outputs for split runs.

use crate::splitter::SinkProvider;
use anyhow::{Context, Result, anyhow};
use std::fs::{File, create_dir_all};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of output number `n`: `<base><n><ext>`.
///
/// ```
/// use csv_streamy::io::output_name;
///
/// assert_eq!(output_name("sales", 3, ".csv"), "sales3.csv");
/// assert_eq!(output_name("sales", 12, ""), "sales12");
/// ```
#[must_use]
pub fn output_name(base: &str, n: u64, ext: &str) -> String {
    format!("{base}{n}{ext}")
}

/// Base name and extension shared by every output of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNaming {
    pub base: String,
    /// Empty, or a leading dot followed by the extension.
    pub ext: String,
}

impl OutputNaming {
    /// Derive naming from the input path: the file stem becomes the base, and
    /// with `with_extension` the input's extension is appended to every output.
    ///
    /// # Errors
    /// Returns an error if the path has no file name.
    pub fn from_input(input: &Path, with_extension: bool) -> Result<Self> {
        let base = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("input path has no file name: {}", input.display()))?
            .to_string();
        let ext = match input.extension().and_then(|e| e.to_str()) {
            Some(e) if with_extension => format!(".{e}"),
            _ => String::new(),
        };
        Ok(Self { base, ext })
    }

    #[must_use]
    pub fn name(&self, n: u64) -> String {
        output_name(&self.base, n, &self.ext)
    }
}

/// Writes each output to `<dir>/<base><n><ext>`.
#[derive(Debug)]
pub struct FileSinks {
    dir: PathBuf,
    naming: OutputNaming,
    written: Vec<PathBuf>,
}

impl FileSinks {
    /// Creates `dir` (and its parents) if needed.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>, naming: OutputNaming) -> Result<Self> {
        let dir = dir.into();
        if !dir.as_os_str().is_empty() {
            create_dir_all(&dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
        }
        Ok(Self {
            dir,
            naming,
            written: Vec::new(),
        })
    }

    #[must_use]
    pub fn path_of(&self, n: u64) -> PathBuf {
        self.dir.join(self.naming.name(n))
    }

    /// Paths of every output opened so far, in order.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl SinkProvider for FileSinks {
    type Sink = BufWriter<File>;

    fn open(&mut self, sequence: u64) -> io::Result<Self::Sink> {
        let path = self.path_of(sequence);
        let file = File::create(&path).map_err(|e| {
            io::Error::new(e.kind(), format!("create {}: {e}", path.display()))
        })?;
        self.written.push(path);
        Ok(BufWriter::new(file))
    }

    fn close(&mut self, _sequence: u64, mut sink: Self::Sink) -> io::Result<()> {
        sink.flush()?;
        sink.get_ref().sync_all()
    }
}
