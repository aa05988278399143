//! dares-runner CLI - run the DARES experiment grid
//!
//! Usage:
//!   dares-runner run  [--python <path>] [--dataset dares1|dares2]... [--on-interrupt continue|abort]
//!   dares-runner plan [--python <path>] [--dataset dares1|dares2]... [--json]
//!
//! `run` launches every experiment in order and prints a summary. `plan`
//! prints the command lines `run` would execute without launching anything.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;

use dares_runner::experiment::{plan, Dataset, Experiment};
use dares_runner::{
    BatchDriver, ExperimentCommand, InterruptPolicy, ProcessInvoker, RunnerConfig, Summary,
};

#[derive(Parser)]
#[command(name = "dares-runner", version)]
#[command(about = "Run the DARES1.0/DARES2.0 model-training experiment grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every experiment, one at a time, and print a summary
    Run {
        #[command(flatten)]
        grid: GridArgs,

        /// What Ctrl-C during a training run does to the rest of the batch
        #[arg(long, value_enum, default_value_t = OnInterrupt::Continue)]
        on_interrupt: OnInterrupt,
    },

    /// Print the command lines `run` would execute
    Plan {
        #[command(flatten)]
        grid: GridArgs,

        /// Emit the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GridArgs {
    /// Python interpreter used to launch the experiment modules
    #[arg(long, env = "DARES_PYTHON", default_value = "python")]
    python: PathBuf,

    /// Directory the `experiments` package is importable from
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// Dataset versions to run (default: both)
    #[arg(long = "dataset", value_enum)]
    datasets: Vec<DatasetArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum DatasetArg {
    Dares1,
    Dares2,
}

impl From<DatasetArg> for Dataset {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Dares1 => Self::Dares1,
            DatasetArg::Dares2 => Self::Dares2,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OnInterrupt {
    /// Skip the interrupted run and keep going
    Continue,
    /// Stop the batch and print the summary
    Abort,
}

impl From<OnInterrupt> for InterruptPolicy {
    fn from(arg: OnInterrupt) -> Self {
        match arg {
            OnInterrupt::Continue => Self::Continue,
            OnInterrupt::Abort => Self::AbortBatch,
        }
    }
}

#[derive(Serialize)]
struct PlanEntry<'a> {
    #[serde(flatten)]
    experiment: &'a Experiment,
    command: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    dares_runner::logging::init(cli.verbose);

    match cli.command {
        Commands::Run { grid, on_interrupt } => {
            let config = build_config(grid, on_interrupt.into())?;
            run(&config)
        }
        Commands::Plan { grid, json } => {
            let config = build_config(grid, InterruptPolicy::default())?;
            print_plan(&config, json)
        }
    }
}

fn build_config(grid: GridArgs, interrupt_policy: InterruptPolicy) -> Result<RunnerConfig> {
    let mut builder = RunnerConfig::builder()
        .interpreter(grid.python)
        .interrupt_policy(interrupt_policy);
    if !grid.datasets.is_empty() {
        builder = builder.datasets(grid.datasets.into_iter().map(Dataset::from));
    }
    if let Some(dir) = grid.workdir {
        builder = builder.working_dir(dir);
    }

    let config = builder.build().context("Invalid runner configuration")?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn run(config: &RunnerConfig) -> Result<()> {
    let invoker = ProcessInvoker::new()
        .context("Failed to initialize process invoker")?
        .working_dir(config.working_dir().map(PathBuf::from));

    let mut stdout = io::stdout().lock();
    let report = BatchDriver::new(config, invoker, &mut stdout)
        .run()
        .context("Batch run failed")?;
    Summary::new(&report)
        .render(&mut stdout)
        .context("Failed to print summary")?;

    // Failed experiments are reported in the summary, not the exit code.
    Ok(())
}

fn print_plan(config: &RunnerConfig, json: bool) -> Result<()> {
    let experiments = plan(config.datasets());
    let entries: Vec<PlanEntry<'_>> = experiments
        .iter()
        .map(|experiment| PlanEntry {
            experiment,
            command: ExperimentCommand::new(config.interpreter(), experiment, config.params())
                .to_string(),
        })
        .collect();

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &entries).context("Failed to write plan")?;
        writeln!(stdout)?;
    } else {
        for entry in &entries {
            writeln!(stdout, "{}", entry.command)?;
        }
        writeln!(stdout)?;
        writeln!(stdout, "{} experiments", entries.len())?;
    }
    Ok(())
}
