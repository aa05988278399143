//! Run Record - outcome of one experiment in the batch

use std::time::Duration;

use chrono::{DateTime, Utc};

use super::{Dataset, Experiment, Grain};

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Training script exited with status 0.
    Success,
    /// Training script exited non-zero, died on a signal, or never started.
    Failed,
    /// Run was cancelled by Ctrl-C.
    Interrupted,
}

/// Run Record is the in-memory result of a single experiment.
///
/// Records are collected for the lifetime of the batch and summarised at the
/// end. They are never written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    dataset: Dataset,
    model: &'static str,
    run_mode: &'static str,
    grain: Grain,
    status: RunStatus,
    elapsed: Duration,
    reason: Option<String>,
    started_at: DateTime<Utc>,
}

impl RunRecord {
    /// Record a successful run.
    #[must_use]
    pub fn success(experiment: &Experiment, started_at: DateTime<Utc>, elapsed: Duration) -> Self {
        Self::new(experiment, started_at, RunStatus::Success, elapsed, None)
    }

    /// Record a failed run.
    #[must_use]
    pub fn failed(
        experiment: &Experiment,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(
            experiment,
            started_at,
            RunStatus::Failed,
            elapsed,
            Some(reason.into()),
        )
    }

    /// Record an interrupted run. Elapsed time is always zero.
    #[must_use]
    pub fn interrupted(experiment: &Experiment, started_at: DateTime<Utc>) -> Self {
        Self::new(
            experiment,
            started_at,
            RunStatus::Interrupted,
            Duration::ZERO,
            Some("interrupted by user".to_string()),
        )
    }

    fn new(
        experiment: &Experiment,
        started_at: DateTime<Utc>,
        status: RunStatus,
        elapsed: Duration,
        reason: Option<String>,
    ) -> Self {
        Self {
            dataset: experiment.dataset,
            model: experiment.model.display_name,
            run_mode: experiment.setting.run_mode,
            grain: experiment.setting.grain,
            status,
            elapsed,
            reason,
            started_at,
        }
    }

    /// Dataset version.
    #[must_use]
    pub const fn dataset(&self) -> Dataset {
        self.dataset
    }

    /// Model display name.
    #[must_use]
    pub const fn model(&self) -> &'static str {
        self.model
    }

    /// Run mode.
    #[must_use]
    pub const fn run_mode(&self) -> &'static str {
        self.run_mode
    }

    /// Grain type.
    #[must_use]
    pub const fn grain(&self) -> Grain {
        self.grain
    }

    /// Final status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Whether the run succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Success
    }

    /// Wall-clock time spent in the run.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Elapsed time in minutes.
    #[must_use]
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed.as_secs_f64() / 60.0
    }

    /// Why the run failed, if it did.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// When the run was launched.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// `dataset | model | run_mode`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{} | {} | {}", self.dataset, self.model, self.run_mode)
    }
}
