//! Output sink contract.

use std::io;

use crate::errors::TeardownError;
use crate::simulation::ObjectReport;
use crate::stellar::PhaseRecord;

/// Destination of per-object detailed histories and of the run summary.
///
/// The population loop opens one detailed file per object, writes its
/// history, writes one summary row and closes the detailed file before the
/// next object is constructed.
pub trait OutputSink {
    fn open_detailed(&mut self, index: usize) -> io::Result<()>;

    fn write_phase(&mut self, record: &PhaseRecord) -> io::Result<()>;

    fn write_summary(&mut self, report: &ObjectReport) -> io::Result<()>;

    /// Close the detailed file of object `index`. A failure here must stop
    /// the run.
    fn close_detailed(&mut self, index: usize) -> Result<(), TeardownError>;

    /// Flush everything still buffered.
    fn flush(&mut self) -> io::Result<()>;
}

/// Discards all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullOutput;

impl OutputSink for NullOutput {
    fn open_detailed(&mut self, _index: usize) -> io::Result<()> {
        Ok(())
    }

    fn write_phase(&mut self, _record: &PhaseRecord) -> io::Result<()> {
        Ok(())
    }

    fn write_summary(&mut self, _report: &ObjectReport) -> io::Result<()> {
        Ok(())
    }

    fn close_detailed(&mut self, _index: usize) -> Result<(), TeardownError> {
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
