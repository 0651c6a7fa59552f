//! Persisting run results.
//!
//! The population loop talks to an [`OutputSink`]; [`CsvOutput`] writes
//! plain CSV files and [`NullOutput`] discards everything.

mod csv;
mod sink;

pub use csv::{CsvOutput, DETAILED_DIR, OutputStats, SUMMARY_FILE};
pub use sink::{NullOutput, OutputSink};
