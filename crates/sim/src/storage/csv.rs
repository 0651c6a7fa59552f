//! CSV output: one summary file per run, one detailed file per object.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::sink::OutputSink;
use crate::errors::TeardownError;
use crate::simulation::ObjectReport;
use crate::stellar::PhaseRecord;

pub const SUMMARY_FILE: &str = "summary.csv";
pub const DETAILED_DIR: &str = "detailed";
const DETAILED_HEADER: &str = "time,event,mass_1,type_1,mass_2,type_2,separation";

/// Counters of what a [`CsvOutput`] wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStats {
    pub summary_rows: usize,
    pub detailed_files: usize,
    pub phase_rows: usize,
}

/// Writes `summary.csv` and `detailed/<index>.csv` under a directory.
#[derive(Debug)]
pub struct CsvOutput {
    directory: PathBuf,
    detailed: bool,
    summary: Option<BufWriter<File>>,
    current: Option<(usize, BufWriter<File>)>,
    stats: OutputStats,
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl CsvOutput {
    /// Create the output directory (and the detailed subdirectory when
    /// `detailed` is set).
    pub fn create(directory: impl AsRef<Path>, detailed: bool) -> io::Result<Self> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory)?;
        if detailed {
            fs::create_dir_all(directory.join(DETAILED_DIR))?;
        }
        Ok(Self {
            directory,
            detailed,
            summary: None,
            current: None,
            stats: OutputStats::default(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn summary_path(&self) -> PathBuf {
        self.directory.join(SUMMARY_FILE)
    }

    pub fn detailed_path(&self, index: usize) -> PathBuf {
        self.directory.join(DETAILED_DIR).join(format!("{index}.csv"))
    }

    pub fn stats(&self) -> OutputStats {
        self.stats
    }
}

impl OutputSink for CsvOutput {
    fn open_detailed(&mut self, index: usize) -> io::Result<()> {
        if !self.detailed {
            return Ok(());
        }
        let mut writer = BufWriter::new(File::create(self.detailed_path(index))?);
        writeln!(writer, "{DETAILED_HEADER}")?;
        self.current = Some((index, writer));
        self.stats.detailed_files += 1;
        Ok(())
    }

    fn write_phase(&mut self, record: &PhaseRecord) -> io::Result<()> {
        let Some((_, writer)) = self.current.as_mut() else {
            return Ok(());
        };
        writeln!(
            writer,
            "{},{},{},{},{},{},{}",
            record.time,
            record.event,
            record.mass_1,
            record.type_1.abbreviation(),
            optional(record.mass_2),
            optional(record.type_2.map(|t| t.abbreviation())),
            optional(record.separation)
        )?;
        self.stats.phase_rows += 1;
        Ok(())
    }

    fn write_summary(&mut self, report: &ObjectReport) -> io::Result<()> {
        if self.summary.is_none() {
            let mut writer = BufWriter::new(File::create(self.summary_path())?);
            writeln!(writer, "{}", report.csv_header())?;
            self.summary = Some(writer);
        }
        let Some(writer) = self.summary.as_mut() else {
            return Ok(());
        };
        writeln!(writer, "{}", report.csv_row())?;
        self.stats.summary_rows += 1;
        Ok(())
    }

    fn close_detailed(&mut self, index: usize) -> Result<(), TeardownError> {
        let Some((open_index, writer)) = self.current.take() else {
            return Ok(());
        };
        debug_assert_eq!(open_index, index);
        let file = writer
            .into_inner()
            .map_err(|e| TeardownError::OutputClose {
                index,
                source: e.into_error(),
            })?;
        file.sync_all()
            .map_err(|source| TeardownError::OutputClose { index, source })?;
        debug!(index, "Closed detailed output");
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(writer) = self.summary.as_mut() {
            writer.flush()?;
        }
        if let Some((_, writer)) = self.current.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::StarReport;
    use crate::stellar::{EvolutionStatus, StellarType};
    use tempfile::tempdir;

    fn star_report(index: usize) -> ObjectReport {
        ObjectReport::Star(StarReport {
            index,
            random_seed: 10 + index as u64,
            initial_mass: 2.0,
            metallicity: 0.0142,
            initial_type: StellarType::MainSequence,
            stellar_type: StellarType::CarbonOxygenWhiteDwarf,
            status: EvolutionStatus::Done,
            diagnostics: Vec::new(),
        })
    }

    #[test]
    fn test_writes_summary_and_detailed_files() {
        let dir = tempdir().unwrap();
        let mut output = CsvOutput::create(dir.path().join("run"), true).unwrap();

        for index in 0..2 {
            output.open_detailed(index).unwrap();
            output
                .write_phase(&PhaseRecord {
                    time: 0.0,
                    event: "ZAMS",
                    mass_1: 2.0,
                    type_1: StellarType::MainSequence,
                    mass_2: None,
                    type_2: None,
                    separation: None,
                })
                .unwrap();
            output.write_summary(&star_report(index)).unwrap();
            output.close_detailed(index).unwrap();
        }
        output.flush().unwrap();

        let summary = fs::read_to_string(output.summary_path()).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("index,random_seed"));
        assert!(lines[2].starts_with("1,11,2,"));

        let detailed = fs::read_to_string(output.detailed_path(1)).unwrap();
        assert_eq!(detailed, format!("{DETAILED_HEADER}\n0,ZAMS,2,MS_gt_07,,,\n"));
        assert_eq!(
            output.stats(),
            OutputStats {
                summary_rows: 2,
                detailed_files: 2,
                phase_rows: 2
            }
        );
    }

    #[test]
    fn test_detailed_output_can_be_disabled() {
        let dir = tempdir().unwrap();
        let mut output = CsvOutput::create(dir.path(), false).unwrap();
        output.open_detailed(0).unwrap();
        output.close_detailed(0).unwrap();
        assert!(!dir.path().join(DETAILED_DIR).exists());
        assert_eq!(output.stats().detailed_files, 0);
    }
}
