//! Append-only JSONL writer for emitted actions and frame reports.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use facemouse_common::error::FacemouseResult;
use serde::Serialize;

/// Lines buffered between automatic flushes.
const FLUSH_EVERY: u64 = 256;

/// Writes one JSON record per line, optionally after a `# {header}` line.
pub struct JsonlWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: u64,
}

impl JsonlWriter {
    /// Create (truncating) the file at `path`, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> FacemouseResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            records_written: 0,
        })
    }

    /// Create the file and write `header` as a `#` comment line.
    pub fn with_header<H: Serialize>(
        path: impl AsRef<Path>,
        header: &H,
    ) -> FacemouseResult<Self> {
        let mut writer = Self::create(path)?;
        let header_json = serde_json::to_string(header)?;
        writeln!(writer.writer, "# {header_json}")?;
        Ok(writer)
    }

    /// Append one record.
    pub fn write_record<T: Serialize>(&mut self, record: &T) -> FacemouseResult<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{json}")?;
        self.records_written += 1;

        if self.records_written % FLUSH_EVERY == 0 {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> FacemouseResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for JsonlWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
