//! End-of-batch summary

use std::io::Write;
use std::time::Duration;

use chrono::Local;

use crate::driver::{rule, BatchReport};
use crate::experiment::RunRecord;
use crate::Result;

/// Totals computed from a finished batch.
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    total_elapsed: Duration,
    total: usize,
    successful: usize,
    not_attempted: usize,
    failures: Vec<&'a RunRecord>,
}

impl<'a> Summary<'a> {
    /// Summarise a batch report.
    #[must_use]
    pub fn new(report: &'a BatchReport) -> Self {
        Self {
            total_elapsed: report.total_elapsed,
            total: report.log.len(),
            successful: report.log.successful(),
            not_attempted: report.not_attempted,
            failures: report.log.failures().collect(),
        }
    }

    /// Wall-clock time of the batch.
    #[must_use]
    pub const fn total_elapsed(&self) -> Duration {
        self.total_elapsed
    }

    /// Number of attempted experiments.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of successful experiments.
    #[must_use]
    pub const fn successful(&self) -> usize {
        self.successful
    }

    /// Number of failed or interrupted experiments.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failed or interrupted experiments, in execution order.
    #[must_use]
    pub fn failures(&self) -> &[&'a RunRecord] {
        &self.failures
    }

    /// Render the summary block.
    ///
    /// # Errors
    ///
    /// Returns an error if `out` cannot be written.
    pub fn render<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", rule())?;
        writeln!(out, "SUMMARY")?;
        writeln!(out, "{}", rule())?;
        writeln!(
            out,
            "Total time: {:.1} hours",
            self.total_elapsed.as_secs_f64() / 3600.0
        )?;
        writeln!(out, "Successful: {}/{}", self.successful, self.total)?;
        writeln!(out, "Failed: {}/{}", self.failed(), self.total)?;
        if self.not_attempted > 0 {
            writeln!(out, "Not attempted: {}", self.not_attempted)?;
        }

        if !self.failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "Failed experiments:")?;
            for record in &self.failures {
                writeln!(out, "  - {}", record.key())?;
            }
        }

        writeln!(out)?;
        writeln!(
            out,
            "End time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        out.flush()?;
        Ok(())
    }
}
