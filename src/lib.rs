//! # dares-runner: DARES Experiment Batch Driver
//!
//! Runs the DARES assessment grid: five pretrained models against six
//! DARES1.0 settings and eight DARES2.0 settings, 70 training runs in all.
//! Each run is an external `python -m experiments.<dataset>_assess` process,
//! launched and waited on one at a time. Results are printed, never stored.
//!
//! ## Execution Order
//!
//! - All DARES1.0 experiments, then all DARES2.0 experiments
//! - Within a dataset: models in table order, settings in table order
//! - A failed run is recorded and the batch moves on
//! - Ctrl-C kills the current run; [`InterruptPolicy`] decides whether the
//!   batch continues
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use dares_runner::{BatchDriver, ProcessInvoker, RunnerConfig, Summary};
//!
//! let config = RunnerConfig::builder().interpreter("python3").build()?;
//! let invoker = ProcessInvoker::new()?;
//! let mut stdout = std::io::stdout();
//!
//! let report = BatchDriver::new(&config, invoker, &mut stdout).run()?;
//! Summary::new(&report).render(&mut stdout)?;
//! # Ok::<(), dares_runner::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod driver;
pub mod error;
pub mod experiment;
pub mod invoker;
pub mod logging;
pub mod summary;

pub use config::{InterruptPolicy, RunnerConfig, RunnerConfigBuilder, TrainingParams};
pub use driver::{BatchDriver, BatchReport};
pub use error::{Error, Result};
pub use invoker::{ExperimentCommand, ExperimentInvoker, Outcome, ProcessInvoker};
pub use summary::Summary;
