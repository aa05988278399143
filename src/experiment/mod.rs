//! Experiment grid and run results
//!
//! ## Schema Overview
//!
//! ```text
//! Dataset (2) ──< Setting (6 | 8)
//!    │
//!    └── x ModelDescriptor (5) ──> Experiment (70) ──> RunRecord ──> ResultLog
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use chrono::Utc;
//! use dares_runner::experiment::{plan, Dataset, ResultLog, RunRecord};
//!
//! let experiments = plan(&Dataset::ALL);
//! assert_eq!(experiments.len(), 70);
//!
//! let mut log = ResultLog::new();
//! log.push(RunRecord::success(&experiments[0], Utc::now(), Duration::from_secs(60)));
//! assert_eq!(log.successful(), 1);
//! ```

mod catalog;
mod log;
mod run_record;

pub use catalog::{
    plan, Dataset, Experiment, Grain, ModelDescriptor, ModelFamily, Setting, DARES1_SETTINGS,
    DARES2_SETTINGS, MODELS,
};
pub use log::ResultLog;
pub use run_record::{RunRecord, RunStatus};
