//! Defines the `CountsWriter`, which commits a counts table atomically.
//!
//! Records are staged in a temporary file next to the destination and only
//! renamed into place by [`CountsWriter::commit`]. Dropping an uncommitted
//! writer removes the staged file, so a failed run leaves no output behind.

use crate::utils::{is_gzipped, Result};
use flate2::{write::GzEncoder, Compression};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const COUNTS_HEADER: &str = "counts";

enum Sink {
    Plain(BufWriter<NamedTempFile>),
    Gzip(GzEncoder<BufWriter<NamedTempFile>>),
}

impl Sink {
    fn as_write(&mut self) -> &mut dyn Write {
        match self {
            Sink::Plain(w) => w as &mut dyn Write,
            Sink::Gzip(w) => w,
        }
    }

    fn finish(self) -> std::io::Result<NamedTempFile> {
        let buffered = match self {
            Sink::Plain(w) => w,
            Sink::Gzip(w) => w.finish()?,
        };
        buffered.into_inner().map_err(|e| e.into_error())
    }
}

pub struct CountsWriter {
    sink: Sink,
    output_path: PathBuf,
    records: usize,
}

impl CountsWriter {
    /// Stages a new counts table destined for `output_path` and writes its header.
    pub fn new(output_path: &Path) -> Result<CountsWriter> {
        let parent = match output_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staged = NamedTempFile::new_in(&parent).map_err(|e| {
            format!(
                "Failed to create temporary file in {}: {}",
                parent.display(),
                e
            )
        })?;
        let buffered = BufWriter::new(staged);
        let sink = if is_gzipped(output_path) {
            Sink::Gzip(GzEncoder::new(buffered, Compression::default()))
        } else {
            Sink::Plain(buffered)
        };

        let mut writer = CountsWriter {
            sink,
            output_path: output_path.to_path_buf(),
            records: 0,
        };
        writeln!(writer.sink.as_write(), "{}", COUNTS_HEADER).map_err(|e| writer.io_error(e))?;
        Ok(writer)
    }

    pub fn write(&mut self, count: usize) -> Result<()> {
        writeln!(self.sink.as_write(), "{}", count).map_err(|e| self.io_error(e))?;
        self.records += 1;
        Ok(())
    }

    pub fn write_all(&mut self, counts: &[usize]) -> Result<()> {
        counts.iter().try_for_each(|&count| self.write(count))
    }

    /// Flushes the staged table and moves it to the output path.
    /// Returns the number of count records written.
    pub fn commit(self) -> Result<usize> {
        let CountsWriter {
            sink,
            output_path,
            records,
        } = self;
        let staged = sink
            .finish()
            .map_err(|e| format!("Failed to write {}: {}", output_path.display(), e))?;
        staged
            .persist(&output_path)
            .map_err(|e| format!("Failed to persist {}: {}", output_path.display(), e))?;
        log::debug!(
            "Committed {} count records to {}",
            records,
            output_path.display()
        );
        Ok(records)
    }

    fn io_error(&self, err: std::io::Error) -> String {
        format!("Failed to write {}: {}", self.output_path.display(), err)
    }
}
