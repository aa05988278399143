//! Experiment invoker
//!
//! Builds the command line for one experiment and runs it to completion.
//! The [`ExperimentInvoker`] trait is the seam between the batch driver and
//! the operating system; [`ProcessInvoker`] is the real implementation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::TrainingParams;
use crate::experiment::Experiment;
use crate::{Error, Result};

/// Fully-resolved command line for one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ExperimentCommand {
    /// Build `<program> -m <module> --model_name ... [--append_column <col>]`.
    #[must_use]
    pub fn new(program: &Path, experiment: &Experiment, params: &TrainingParams) -> Self {
        let save_predictions = if params.save_predictions { "True" } else { "False" };

        let mut args = vec![
            "-m".to_string(),
            experiment.dataset.module().to_string(),
            "--model_name".to_string(),
            experiment.model.identifier.to_string(),
            "--model_type".to_string(),
            experiment.model.family.as_str().to_string(),
            "--num_train_epochs".to_string(),
            params.num_train_epochs.to_string(),
            "--run_mode".to_string(),
            experiment.setting.run_mode.to_string(),
            "--n_fold".to_string(),
            params.n_fold.to_string(),
            "--cuda_device".to_string(),
            params.cuda_device.to_string(),
            "--lr".to_string(),
            params.lr.to_string(),
            "--save_predictions".to_string(),
            save_predictions.to_string(),
        ];

        if let Some(column) = experiment.setting.append_column {
            args.push("--append_column".to_string());
            args.push(column.to_string());
        }

        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// Program to execute.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments after the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Value following `flag`, if the flag is present.
    #[must_use]
    pub fn arg_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for ExperimentCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How a single experiment ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Exit status 0.
    Succeeded {
        /// Wall-clock time of the run.
        elapsed: Duration,
    },
    /// Non-zero exit, death by signal, or the program could not be started.
    Failed {
        /// Wall-clock time until the failure was observed.
        elapsed: Duration,
        /// Human-readable cause.
        reason: String,
    },
    /// Ctrl-C arrived while waiting; the child was killed.
    Interrupted,
}

/// Runs one experiment and blocks until it finishes.
pub trait ExperimentInvoker {
    /// Run `command` for `experiment`.
    fn invoke(&mut self, experiment: &Experiment, command: &ExperimentCommand) -> Outcome;
}

impl<T: ExperimentInvoker + ?Sized> ExperimentInvoker for &mut T {
    fn invoke(&mut self, experiment: &Experiment, command: &ExperimentCommand) -> Outcome {
        (**self).invoke(experiment, command)
    }
}

enum Wait {
    Exited(ExitStatus),
    Interrupted,
}

/// Ctrl-C listener held for the lifetime of the invoker.
///
/// Installing the handler once keeps SIGINT from reaching its default
/// disposition at any point after construction, including the instants
/// around a spawn and the gaps between runs.
struct InterruptListener {
    #[cfg(unix)]
    inner: tokio::signal::unix::Signal,
    #[cfg(windows)]
    inner: tokio::signal::windows::CtrlC,
}

impl InterruptListener {
    /// Must be called inside the invoker's runtime context.
    fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        let inner = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;
        #[cfg(windows)]
        let inner = tokio::signal::windows::ctrl_c()?;
        Ok(Self { inner })
    }

    /// Resolves on the next Ctrl-C, or immediately if one arrived since the
    /// last call.
    async fn recv(&mut self) {
        if self.inner.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }
}

/// Launches experiments as child processes.
///
/// The child inherits stdin/stdout/stderr. A current-thread tokio runtime
/// races the child's exit against Ctrl-C; on Ctrl-C the child is killed and
/// reaped before returning. A Ctrl-C that lands between runs interrupts the
/// next experiment.
pub struct ProcessInvoker {
    // Dropped before the runtime it was registered with.
    interrupts: InterruptListener,
    runtime: tokio::runtime::Runtime,
    working_dir: Option<PathBuf>,
}

impl ProcessInvoker {
    /// Create an invoker that runs children in the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Runtime`] if the tokio runtime cannot be built, or
    /// [`Error::SignalHandler`] if the Ctrl-C handler cannot be installed.
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::Runtime(e.to_string()))?;

        let interrupts = {
            let _guard = runtime.enter();
            InterruptListener::install().map_err(|e| Error::SignalHandler(e.to_string()))?
        };

        Ok(Self {
            interrupts,
            runtime,
            working_dir: None,
        })
    }

    /// Run children in `dir` instead of the current directory.
    #[must_use]
    pub fn working_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.working_dir = dir;
        self
    }
}

impl ExperimentInvoker for ProcessInvoker {
    fn invoke(&mut self, experiment: &Experiment, command: &ExperimentCommand) -> Outcome {
        let mut child = tokio::process::Command::new(command.program());
        child.args(command.args()).kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            child.current_dir(dir);
        }

        debug!(experiment = %experiment.key(), command = %command, "spawning experiment");

        let start = Instant::now();
        let interrupts = &mut self.interrupts;
        let waited = self.runtime.block_on(wait_or_interrupt(child, interrupts));
        let elapsed = start.elapsed();

        match waited {
            Ok(Wait::Exited(status)) if status.success() => Outcome::Succeeded { elapsed },
            Ok(Wait::Exited(status)) => Outcome::Failed {
                elapsed,
                reason: format!("command returned {status}"),
            },
            Ok(Wait::Interrupted) => Outcome::Interrupted,
            Err(e) => Outcome::Failed {
                elapsed,
                reason: format!("failed to launch {}: {e}", command.program().display()),
            },
        }
    }
}

async fn wait_or_interrupt(
    mut command: tokio::process::Command,
    interrupts: &mut InterruptListener,
) -> std::io::Result<Wait> {
    let mut child = command.spawn()?;

    tokio::select! {
        biased;

        () = interrupts.recv() => {
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill interrupted experiment");
            }
            Ok(Wait::Interrupted)
        }
        status = child.wait() => status.map(Wait::Exited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{plan, Dataset};

    fn command_for(dataset: Dataset, index: usize) -> ExperimentCommand {
        let experiment = plan(&[dataset])[index];
        ExperimentCommand::new(Path::new("python"), &experiment, &TrainingParams::default())
    }

    #[test]
    fn test_raw_mode_command_line() {
        let command = command_for(Dataset::Dares1, 0);
        assert_eq!(
            command.to_string(),
            "python -m experiments.dares1.0_assess \
             --model_name CAMeL-Lab/bert-base-arabic-camelbert-mix --model_type bert \
             --num_train_epochs 4 --run_mode raw --n_fold 3 --cuda_device 0 \
             --lr 0.00001 --save_predictions True"
        );
        assert!(command.arg_value("--append_column").is_none());
    }

    #[test]
    fn test_append_column_is_last() {
        let command = command_for(Dataset::Dares2, 3);
        let args = command.args();
        assert_eq!(&args[args.len() - 2..], ["--append_column", "word_file"]);
        assert_eq!(command.arg_value("--run_mode"), Some("word_file"));
    }

    #[test]
    fn test_module_follows_dataset() {
        assert_eq!(
            command_for(Dataset::Dares2, 0).arg_value("-m"),
            Some("experiments.dares2.0_assess")
        );
    }

    #[test]
    fn test_save_predictions_false() {
        let experiment = plan(&[Dataset::Dares1])[0];
        let params = TrainingParams {
            save_predictions: false,
            ..TrainingParams::default()
        };
        let command = ExperimentCommand::new(Path::new("python"), &experiment, &params);
        assert_eq!(command.arg_value("--save_predictions"), Some("False"));
    }
}
