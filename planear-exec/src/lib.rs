//! Execution engine for Planear plans.
//!
//! - [`RetryPolicy`] retries a fallible operation with exponential backoff.
//! - [`execute_tasks`] runs independent [`Task`]s on a fixed number of
//!   worker threads.
//! - [`execute_operations`] turns a plan into retried tasks, runs them on the
//!   pool, collects an [`ExecutionReport`](planear_types::ExecutionReport)
//!   and runs the finalize step.

mod engine;
mod error;
mod pool;
mod retry;

pub use engine::{ExecuteConfig, ExecutionOutcome, Operations, OperationsBuilder, execute_operations};
pub use error::{ExecError, ExecResult, PoolError, PoolResult, RetryError};
pub use pool::{Task, execute_tasks};
pub use retry::RetryPolicy;
