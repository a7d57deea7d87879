//! Error types for plan execution.

use planear_types::OperationKind;
use thiserror::Error;

/// Result type for engine calls.
pub type ExecResult<T> = Result<T, ExecError>;

/// Result type for the worker pool.
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool-level failures. Task errors go to the task callbacks; only panics
/// that escaped a task are counted here.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool requires at least one worker")]
    NoWorkers,

    #[error("{0} task(s) panicked")]
    TaskPanicked(usize),
}

/// An operation that kept failing until its retry budget ran out.
///
/// The per-attempt causes are logged, not carried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError {
    #[error("operation failed after {attempts} retries")]
    Exhausted { kind: OperationKind, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum ExecError {
    /// A required callback or formatter was never supplied.
    #[error("missing required callback: {0}")]
    MissingCallback(&'static str),

    #[error("parallelism must be at least 1")]
    InvalidParallelism,

    /// The finalize callback exhausted its retries.
    #[error("finalization failed: {0}")]
    Finalization(RetryError),

    #[error(transparent)]
    Pool(#[from] PoolError),
}
