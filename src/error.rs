//! Error types for dares-runner
//!
//! Experiment failures are not errors: a failed or interrupted run is an
//! [`Outcome`](crate::invoker::Outcome) and the batch carries on. These
//! variants cover problems that prevent the batch from running at all.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// dares-runner error types
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration rejected by `RunnerConfigBuilder::build`
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Async runtime for the process invoker could not be created
    #[error("Failed to start process runtime: {0}")]
    Runtime(String),

    /// Ctrl-C handler could not be installed
    #[error("Failed to install interrupt handler: {0}")]
    SignalHandler(String),

    /// IO error (writing progress output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
