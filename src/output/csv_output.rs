//! CSV output sink
//!
//! Writes one header row followed by one row per record, in the order the
//! records were harvested.

use crate::output::traits::{OutputResult, OutputSink, ProductRecord, COLUMNS};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes product records as UTF-8 CSV
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    destination: String,
}

impl CsvSink<File> {
    /// Creates (or truncates) the CSV file at `path`
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
            destination: PathBuf::from(path).display().to_string(),
        })
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps an arbitrary writer
    pub fn from_writer(writer: W, destination: impl Into<String>) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
            destination: destination.into(),
        }
    }

    /// Consumes the sink and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::output::OutputError::Io(e.into_error()))
    }
}

impl<W: Write> OutputSink for CsvSink<W> {
    fn write(&mut self, records: &[ProductRecord]) -> OutputResult<()> {
        self.writer.write_record(COLUMNS)?;
        for record in records {
            self.writer.write_record(record.to_row())?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.destination.clone()
    }
}
