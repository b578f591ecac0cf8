//! CSV serialization of enriched rows.

use crate::core::enrich::EnrichedRow;
use crate::core::error::MergeError;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Header-first CSV writer bound to a fixed column schema.
///
/// Minimal quoting, CRLF terminators, UTF-8. Buffered rows are flushed when
/// the sink is dropped, so a failed run keeps what it wrote so far.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
    schema: Vec<String>,
    rows: usize,
}

impl CsvSink<File> {
    /// Create or truncate `path` and write the header.
    pub fn create(path: &Path, schema: Vec<String>) -> Result<Self, MergeError> {
        let file = File::create(path).map_err(|e| MergeError::io(path, e))?;
        CsvSink::new(file, path, schema)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap `inner`; `path` names the destination in I/O errors.
    pub fn new(inner: W, path: impl Into<PathBuf>, schema: Vec<String>) -> Result<Self, MergeError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::CRLF)
            .from_writer(inner);
        writer.write_record(&schema)?;
        Ok(CsvSink {
            writer,
            path: path.into(),
            schema,
            rows: 0,
        })
    }

    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    pub fn rows_written(&self) -> usize {
        self.rows
    }

    pub fn write_row(&mut self, row: &EnrichedRow) -> Result<(), MergeError> {
        self.writer.write_record(row.project(&self.schema))?;
        self.rows += 1;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn finish(self) -> Result<W, MergeError> {
        let path = self.path;
        self.writer
            .into_inner()
            .map_err(|e| MergeError::io(path, e.into_error()))
    }
}
