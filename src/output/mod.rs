//! Output module for persisting harvested records
//!
//! This module handles:
//! - The product record and its tabular column layout
//! - Writing records to CSV files or an SQLite database
//! - Summarising a harvest for the end-of-run report

mod csv_output;
mod sqlite_output;
pub mod stats;
mod traits;

pub use csv_output::CsvSink;
pub use sqlite_output::SqliteSink;
pub use stats::{print_statistics, CategoryStatistics, HarvestStatistics};
pub use traits::{OutputError, OutputResult, OutputSink, ProductRecord, COLUMNS, NOT_AVAILABLE};

use crate::config::OutputFormat;
use std::path::Path;

/// Opens the sink for `format` at `path`
///
/// # Returns
///
/// * `Ok(Box<dyn OutputSink>)` - The destination was created or opened
/// * `Err(OutputError)` - The file or database could not be opened
pub fn open_sink(path: &Path, format: OutputFormat) -> OutputResult<Box<dyn OutputSink>> {
    tracing::debug!("Opening {:?} output at {}", format, path.display());
    match format {
        OutputFormat::Csv => Ok(Box::new(CsvSink::create(path)?)),
        OutputFormat::Sqlite => Ok(Box::new(SqliteSink::open(path)?)),
    }
}
