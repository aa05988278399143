//! Batch driver
//!
//! Walks the experiment plan strictly in order, one child process at a time,
//! printing progress banners and collecting a [`RunRecord`] per experiment.
//! Failures are recorded and never stop the batch; an interrupt stops it
//! only under [`InterruptPolicy::AbortBatch`].

use std::io::Write;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};
use tracing::{info, warn};

use crate::config::{InterruptPolicy, RunnerConfig};
use crate::experiment::{plan, Dataset, Experiment, ResultLog, RunRecord, RunStatus, MODELS};
use crate::invoker::{ExperimentCommand, ExperimentInvoker, Outcome};
use crate::Result;

/// Width of the `=` rules framing banners.
pub const RULE_WIDTH: usize = 70;

pub(crate) fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Everything a finished batch produced.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Records in execution order.
    pub log: ResultLog,
    /// Wall-clock time of the whole batch.
    pub total_elapsed: Duration,
    /// Experiments skipped because the batch was aborted.
    pub not_attempted: usize,
}

impl BatchReport {
    /// Whether the batch stopped before the end of the plan.
    #[must_use]
    pub const fn aborted(&self) -> bool {
        self.not_attempted > 0
    }
}

/// Sequential experiment driver.
pub struct BatchDriver<'a, I, W> {
    config: &'a RunnerConfig,
    invoker: I,
    out: W,
}

impl<'a, I: ExperimentInvoker, W: Write> BatchDriver<'a, I, W> {
    /// Create a driver writing progress to `out`.
    pub fn new(config: &'a RunnerConfig, invoker: I, out: W) -> Self {
        Self {
            config,
            invoker,
            out,
        }
    }

    /// Run every experiment of the configured datasets.
    ///
    /// # Errors
    ///
    /// Returns an error only if progress output cannot be written.
    pub fn run(&mut self) -> Result<BatchReport> {
        let experiments = plan(self.config.datasets());
        let start = Instant::now();

        self.write_header(experiments.len())?;

        let mut log = ResultLog::new();
        let not_attempted = self.run_experiments(&experiments, &mut log)?;

        Ok(BatchReport {
            log,
            total_elapsed: start.elapsed(),
            not_attempted,
        })
    }

    /// Run `experiments` in order, appending a record per attempted
    /// experiment to `log`.
    ///
    /// Returns how many experiments were left unattempted (non-zero only
    /// after an interrupt under [`InterruptPolicy::AbortBatch`]).
    ///
    /// # Errors
    ///
    /// Returns an error only if progress output cannot be written.
    pub fn run_experiments(
        &mut self,
        experiments: &[Experiment],
        log: &mut ResultLog,
    ) -> Result<usize> {
        let mut phase: Option<Dataset> = None;
        let mut phase_number = 0;

        for (index, experiment) in experiments.iter().enumerate() {
            if phase != Some(experiment.dataset) {
                phase = Some(experiment.dataset);
                phase_number += 1;
                self.write_phase(phase_number, experiment.dataset)?;
            }

            let record = self.run_one(experiment)?;
            let interrupted = record.status() == RunStatus::Interrupted;
            log.push(record);

            if interrupted && self.config.interrupt_policy() == InterruptPolicy::AbortBatch {
                let remaining = experiments.len() - index - 1;
                warn!(remaining, "batch aborted after interrupt");
                writeln!(
                    self.out,
                    "[ABORTED] Stopping batch, {remaining} experiments not attempted"
                )?;
                return Ok(remaining);
            }
        }

        Ok(0)
    }

    fn run_one(&mut self, experiment: &Experiment) -> Result<RunRecord> {
        let command = ExperimentCommand::new(
            self.config.interpreter(),
            experiment,
            self.config.params(),
        );

        writeln!(self.out)?;
        writeln!(self.out, "{}", rule())?;
        writeln!(
            self.out,
            "[{}] {} | {} | {} | {}",
            Local::now().format("%H:%M:%S"),
            experiment.dataset,
            experiment.model.display_name,
            experiment.setting.run_mode,
            experiment.setting.grain
        )?;
        writeln!(self.out, "{}", rule())?;
        writeln!(self.out, "Command: {command}")?;
        writeln!(self.out)?;
        self.out.flush()?;

        info!(
            dataset = %experiment.dataset,
            model = experiment.model.display_name,
            run_mode = experiment.setting.run_mode,
            grain = %experiment.setting.grain,
            "experiment started"
        );

        let started_at = Utc::now();
        let record = match self.invoker.invoke(experiment, &command) {
            Outcome::Succeeded { elapsed } => {
                let record = RunRecord::success(experiment, started_at, elapsed);
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "[SUCCESS] Completed in {:.1} minutes",
                    record.elapsed_minutes()
                )?;
                record
            }
            Outcome::Failed { elapsed, reason } => {
                let record = RunRecord::failed(experiment, started_at, elapsed, reason);
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "[FAILED] Error after {:.1} minutes: {}",
                    record.elapsed_minutes(),
                    record.reason().unwrap_or_default()
                )?;
                record
            }
            Outcome::Interrupted => {
                writeln!(self.out)?;
                writeln!(self.out, "[INTERRUPTED] User cancelled")?;
                RunRecord::interrupted(experiment, started_at)
            }
        };
        self.out.flush()?;

        info!(
            experiment = %record.key(),
            status = ?record.status(),
            started_at = %record.started_at().to_rfc3339(),
            elapsed_secs = record.elapsed().as_secs_f64(),
            "experiment finished"
        );

        Ok(record)
    }

    fn write_header(&mut self, total: usize) -> Result<()> {
        writeln!(self.out, "{}", rule())?;
        writeln!(self.out, "DARES Experiments Runner")?;
        writeln!(self.out, "{}", rule())?;
        writeln!(
            self.out,
            "Start time: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.out, "Models: {}", MODELS.len())?;
        for dataset in self.config.datasets() {
            writeln!(
                self.out,
                "{dataset} experiments: {}",
                dataset.experiment_count()
            )?;
        }
        writeln!(self.out, "Total experiments: {total}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_phase(&mut self, number: usize, dataset: Dataset) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", rule())?;
        writeln!(self.out, "PHASE {number}: {dataset} Experiments")?;
        writeln!(self.out, "{}", rule())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysSucceeds;

    impl ExperimentInvoker for AlwaysSucceeds {
        fn invoke(&mut self, _: &Experiment, _: &ExperimentCommand) -> Outcome {
            Outcome::Succeeded {
                elapsed: Duration::ZERO,
            }
        }
    }

    #[test]
    fn test_run_prints_phases_in_order() {
        let config = RunnerConfig::default();
        let mut out = Vec::new();
        let report = BatchDriver::new(&config, AlwaysSucceeds, &mut out)
            .run()
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        let phase1 = text.find("PHASE 1: DARES1.0 Experiments").unwrap();
        let phase2 = text.find("PHASE 2: DARES2.0 Experiments").unwrap();
        assert!(phase1 < phase2);
        assert!(text.contains("Total experiments: 70"));
        assert_eq!(text.matches("[SUCCESS] Completed in 0.0 minutes").count(), 70);
        assert_eq!(report.log.len(), 70);
        assert!(!report.aborted());
    }

    #[test]
    fn test_single_dataset_is_phase_one() {
        let config = RunnerConfig::builder()
            .datasets([Dataset::Dares2])
            .build()
            .unwrap();
        let mut out = Vec::new();
        let report = BatchDriver::new(&config, AlwaysSucceeds, &mut out)
            .run()
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("PHASE 1: DARES2.0 Experiments"));
        assert!(!text.contains("DARES1.0 experiments:"));
        assert_eq!(report.log.len(), 40);
    }
}
