//! Runner configuration
//!
//! Defaults reproduce the fixed training setup of the DARES assessment:
//! 4 epochs, 3 folds, GPU 0, learning rate 1e-5, predictions saved.

use std::path::PathBuf;

use crate::experiment::Dataset;
use crate::{Error, Result};

/// Hyperparameters forwarded to every training run.
///
/// The batch always uses [`TrainingParams::default`]; the struct exists so
/// command construction can be exercised with other values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingParams {
    /// `--num_train_epochs`
    pub num_train_epochs: u32,
    /// `--n_fold`
    pub n_fold: u32,
    /// `--cuda_device`
    pub cuda_device: u32,
    /// `--lr`
    pub lr: f64,
    /// `--save_predictions`
    pub save_predictions: bool,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            num_train_epochs: 4,
            n_fold: 3,
            cuda_device: 0,
            lr: 0.000_01,
            save_predictions: true,
        }
    }
}

/// What an interrupt (Ctrl-C) during a training run does to the batch.
///
/// Either way the interrupted run is killed and recorded as a failure with
/// zero elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterruptPolicy {
    /// Move on to the next experiment.
    #[default]
    Continue,
    /// Stop the batch and report what ran so far.
    AbortBatch,
}

/// Configuration for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    interpreter: PathBuf,
    working_dir: Option<PathBuf>,
    datasets: Vec<Dataset>,
    interrupt_policy: InterruptPolicy,
    params: TrainingParams,
}

impl RunnerConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    /// Python interpreter used to launch the experiment modules.
    #[must_use]
    pub fn interpreter(&self) -> &std::path::Path {
        &self.interpreter
    }

    /// Directory the experiment modules are resolved from, if not the
    /// current one.
    #[must_use]
    pub fn working_dir(&self) -> Option<&std::path::Path> {
        self.working_dir.as_deref()
    }

    /// Dataset versions to run, in order.
    #[must_use]
    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    /// Interrupt handling policy.
    #[must_use]
    pub const fn interrupt_policy(&self) -> InterruptPolicy {
        self.interrupt_policy
    }

    /// Training hyperparameters (always the fixed defaults).
    #[must_use]
    pub const fn params(&self) -> &TrainingParams {
        &self.params
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interpreter: PathBuf::from("python"),
            working_dir: None,
            datasets: Dataset::ALL.to_vec(),
            interrupt_policy: InterruptPolicy::default(),
            params: TrainingParams::default(),
        }
    }
}

/// Builder for `RunnerConfig`
#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    /// Set the Python interpreter
    #[must_use]
    pub fn interpreter(mut self, interpreter: impl Into<PathBuf>) -> Self {
        self.config.interpreter = interpreter.into();
        self
    }

    /// Set the working directory for child processes
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    /// Restrict the run to the given datasets
    ///
    /// Duplicates are dropped and execution order is always DARES1.0 then
    /// DARES2.0.
    #[must_use]
    pub fn datasets(mut self, datasets: impl IntoIterator<Item = Dataset>) -> Self {
        let mut datasets: Vec<Dataset> = datasets.into_iter().collect();
        datasets.sort_unstable();
        datasets.dedup();
        self.config.datasets = datasets;
        self
    }

    /// Set the interrupt policy
    #[must_use]
    pub fn interrupt_policy(mut self, policy: InterruptPolicy) -> Self {
        self.config.interrupt_policy = policy;
        self
    }

    /// Build the config
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if no dataset is selected or the
    /// interpreter is empty.
    pub fn build(self) -> Result<RunnerConfig> {
        let config = self.config;

        if config.datasets.is_empty() {
            return Err(Error::InvalidConfig("no dataset selected".to_string()));
        }
        if config.interpreter.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("interpreter path is empty".to_string()));
        }

        Ok(config)
    }
}
