use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Line-delimited JSON writer. One record per line, UTF-8, flushed on
/// finish so a crash mid-run still leaves a readable prefix of the output.
pub struct JsonlWriter {
    inner: BufWriter<File>,
}

impl JsonlWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file at {}", path.display()))?;
        Ok(Self {
            inner: BufWriter::new(file),
        })
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        serde_json::to_writer(&mut self.inner, record).context("Failed to serialize record")?;
        self.inner
            .write_all(b"\n")
            .context("Failed to write record separator")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner.flush().context("Failed to flush output file")
    }
}
