//! Reconciliation plans and execution reports.

use crate::record::{RecordAddition, RecordDeletion, RecordIgnored, RecordUpdate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The classified set of changes needed to make the remote record set match
/// the local one.
///
/// Every key appears in at most one bucket. Keys whose local and remote
/// records are identical appear in none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Plan<T> {
    #[serde(default)]
    pub additions: Vec<RecordAddition<T>>,
    #[serde(default)]
    pub updates: Vec<RecordUpdate<T>>,
    #[serde(default)]
    pub deletions: Vec<RecordDeletion<T>>,
    #[serde(default)]
    pub ignores: Vec<RecordIgnored<T>>,
}

impl<T> Default for Plan<T> {
    fn default() -> Self {
        Self {
            additions: Vec::new(),
            updates: Vec::new(),
            deletions: Vec::new(),
            ignores: Vec::new(),
        }
    }
}

impl<T> Plan<T> {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if all four buckets are empty.
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
            && self.updates.is_empty()
            && self.deletions.is_empty()
            && self.ignores.is_empty()
    }

    /// Number of executable operations (additions, updates, deletions).
    pub fn operation_count(&self) -> usize {
        self.additions.len() + self.updates.len() + self.deletions.len()
    }

    /// Per-bucket counts.
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            additions: self.additions.len(),
            updates: self.updates.len(),
            deletions: self.deletions.len(),
            ignores: self.ignores.len(),
        }
    }
}

/// Bucket counts of a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub additions: usize,
    pub updates: usize,
    pub deletions: usize,
    pub ignores: usize,
}

impl PlanSummary {
    /// Sum of all four buckets.
    pub fn total(&self) -> usize {
        self.additions + self.updates + self.deletions + self.ignores
    }
}

/// Outcome of applying a plan.
///
/// `success` and `failure` reuse the plan shape as typed buckets; their
/// `ignores` are always empty. Ignored records are carried over from the
/// source plan in `ignores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ExecutionReport<T> {
    pub success: Plan<T>,
    pub failure: Plan<T>,
    #[serde(default)]
    pub ignores: Vec<RecordIgnored<T>>,
    pub finalization_success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalization_error_msg: Option<String>,
}

impl<T> ExecutionReport<T> {
    /// Creates a report with empty buckets, carrying over the given ignores.
    pub fn new(ignores: Vec<RecordIgnored<T>>) -> Self {
        Self {
            success: Plan::new(),
            failure: Plan::new(),
            ignores,
            finalization_success: true,
            finalization_error_msg: None,
        }
    }

    pub fn succeeded_count(&self) -> usize {
        self.success.operation_count()
    }

    pub fn failed_count(&self) -> usize {
        self.failure.operation_count()
    }

    /// True if any record operation ended up in the failure bucket.
    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// The kind of side effect an operation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Add,
    Update,
    Delete,
    Finalize,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Finalize => "finalize",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
