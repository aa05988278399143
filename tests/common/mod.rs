//! Scripted invoker shared by the driver and property tests

#![allow(dead_code)]

use std::time::Duration;

use dares_runner::experiment::{Dataset, Experiment};
use dares_runner::{ExperimentCommand, ExperimentInvoker, Outcome};

/// One observed invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub dataset: Dataset,
    pub model: &'static str,
    pub run_mode: &'static str,
    pub args: Vec<String>,
}

/// Invoker that records every call and answers from a script.
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    pub calls: Vec<Call>,
    /// `(dataset, model display name, run_mode)` triples that fail.
    pub failing: Vec<(Option<Dataset>, &'static str, &'static str)>,
    /// Zero-based call indices that report an interrupt.
    pub interrupt_at: Vec<usize>,
    /// Elapsed time reported for every non-interrupted run.
    pub elapsed: Duration,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(mut self, dataset: Option<Dataset>, model: &'static str, run_mode: &'static str) -> Self {
        self.failing.push((dataset, model, run_mode));
        self
    }

    pub fn interrupt_at(mut self, index: usize) -> Self {
        self.interrupt_at.push(index);
        self
    }

    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

impl ExperimentInvoker for ScriptedInvoker {
    fn invoke(&mut self, experiment: &Experiment, command: &ExperimentCommand) -> Outcome {
        let index = self.calls.len();
        self.calls.push(Call {
            dataset: experiment.dataset,
            model: experiment.model.display_name,
            run_mode: experiment.setting.run_mode,
            args: command.args().to_vec(),
        });

        if self.interrupt_at.contains(&index) {
            return Outcome::Interrupted;
        }

        let fails = self.failing.iter().any(|(dataset, model, run_mode)| {
            dataset.map_or(true, |d| d == experiment.dataset)
                && *model == experiment.model.display_name
                && *run_mode == experiment.setting.run_mode
        });

        if fails {
            Outcome::Failed {
                elapsed: self.elapsed,
                reason: "command returned exit status: 1".to_string(),
            }
        } else {
            Outcome::Succeeded {
                elapsed: self.elapsed,
            }
        }
    }
}
