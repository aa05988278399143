//! Result Log - append-only accumulator for run records
//!
//! The log is owned by the caller of the batch driver and passed down
//! explicitly. Insertion order is execution order.

use std::time::Duration;

use super::{RunRecord, RunStatus};

/// Ordered, in-memory collection of run records.
#[derive(Debug, Default, Clone)]
pub struct ResultLog {
    records: Vec<RunRecord>,
}

impl ResultLog {
    /// Create a new empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if no run has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of recorded runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Append a record.
    pub fn push(&mut self, record: RunRecord) {
        self.records.push(record);
    }

    /// All records, in execution order.
    #[must_use]
    pub fn records(&self) -> &[RunRecord] {
        &self.records
    }

    /// Number of successful runs.
    #[must_use]
    pub fn successful(&self) -> usize {
        self.records.iter().filter(|r| r.is_success()).count()
    }

    /// Number of runs that did not succeed (failed or interrupted).
    #[must_use]
    pub fn failed(&self) -> usize {
        self.len() - self.successful()
    }

    /// Number of runs cancelled by Ctrl-C.
    #[must_use]
    pub fn interrupted(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status() == RunStatus::Interrupted)
            .count()
    }

    /// Runs that did not succeed, in execution order.
    pub fn failures(&self) -> impl Iterator<Item = &RunRecord> {
        self.records.iter().filter(|r| !r.is_success())
    }

    /// Sum of per-run elapsed times.
    #[must_use]
    pub fn run_time(&self) -> Duration {
        self.records.iter().map(RunRecord::elapsed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{plan, Dataset};
    use chrono::Utc;

    #[test]
    fn test_log_default() {
        let log = ResultLog::new();
        assert!(log.is_empty());
        assert_eq!(log.successful(), 0);
        assert_eq!(log.failed(), 0);
        assert_eq!(log.run_time(), Duration::ZERO);
    }

    #[test]
    fn test_log_counts() {
        let experiments = plan(&[Dataset::Dares1]);
        let mut log = ResultLog::new();
        log.push(RunRecord::success(&experiments[0], Utc::now(), Duration::from_secs(10)));
        log.push(RunRecord::failed(&experiments[1], Utc::now(), Duration::from_secs(5), "exit status: 2"));
        log.push(RunRecord::interrupted(&experiments[2], Utc::now()));

        assert_eq!(log.len(), 3);
        assert_eq!(log.successful(), 1);
        assert_eq!(log.failed(), 2);
        assert_eq!(log.interrupted(), 1);
        assert_eq!(log.run_time(), Duration::from_secs(15));

        let failed: Vec<&str> = log.failures().map(RunRecord::run_mode).collect();
        assert_eq!(failed, vec!["append_word", "append_filename"]);
    }
}
