//! Plan-then-apply reconciliation of record sets.
//!
//! A run has two phases:
//!
//! 1. [`generate`] loads the desired records from a directory of CSV files
//!    and the actual records through a callback, diffs them into a
//!    [`Plan`], renders it, and saves it as JSON.
//! 2. [`apply`] loads the saved plan and executes it with user callbacks on
//!    a bounded worker pool, retrying each operation, then renders an
//!    [`ExecutionReport`].
//!
//! The building blocks are re-exported for callers that want to drive the
//! stages themselves.

mod apply;
mod config;
mod error;
mod generate;
mod store;

pub use apply::{ApplyParams, apply};
pub use config::{DEFAULT_CONFIG_FILE, DEFAULT_PLAN_FILE, ReconcileConfig};
pub use error::{PlanearError, PlanearResult};
pub use generate::{GenerateParams, generate};
pub use store::{load_plan, remove_stale_plan, save_plan, save_report};

pub use planear_diff::{DiffError, compute_plan_diff, diff_records};
pub use planear_exec::{
    ExecError, ExecuteConfig, ExecutionOutcome, Operations, OperationsBuilder, RetryError,
    RetryPolicy, execute_operations,
};
pub use planear_input::{InputError, load_csv_directory};
pub use planear_render::{Theme, format_execution_report, format_plan};
pub use planear_types::{
    ExecutionReport, FieldChange, Key, OperationKind, Plan, PlanSummary, Record, RecordAddition,
    RecordDeletion, RecordIgnored, RecordUpdate,
};
