//! Error types for plan generation and application.

use planear_diff::DiffError;
use planear_exec::ExecError;
use planear_input::InputError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type PlanearResult<T> = Result<T, PlanearError>;

#[derive(Debug, Error)]
pub enum PlanearError {
    /// A required callback was not supplied.
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("failed to load local CSV records: {0}")]
    Input(#[from] InputError),

    #[error("failed to load remote records: {0:#}")]
    RemoteLoad(anyhow::Error),

    #[error("error generating plan diff: {0}")]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    /// The plan file exists but is not a valid plan.
    #[error("malformed plan file {}: {source}", path.display())]
    MalformedPlan {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing rendered output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    /// At least one record operation exhausted its retries.
    #[error("some operations failed: {added} added, {updated} updated, {deleted} deleted")]
    OperationsFailed {
        added: usize,
        updated: usize,
        deleted: usize,
    },
}

impl PlanearError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
