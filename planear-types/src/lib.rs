//! Core type definitions for Planear.
//!
//! This crate defines the data model shared by every stage of a
//! reconciliation run:
//! - Record operations ([`RecordAddition`], [`RecordUpdate`],
//!   [`RecordDeletion`], [`RecordIgnored`]) and the [`FieldChange`]s that
//!   describe an update
//! - The [`Plan`] produced by diffing local (desired) against remote (actual)
//!   records
//! - The [`ExecutionReport`] produced by applying a plan
//!
//! The record type itself is user-defined. Anything that is cloneable,
//! comparable, and serde-serializable qualifies as a [`Record`].

mod plan;
mod record;

pub use plan::{ExecutionReport, OperationKind, Plan, PlanSummary};
pub use record::{
    FieldChange, Key, RecordAddition, RecordDeletion, RecordIgnored, RecordUpdate, format_value,
};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Bound satisfied by any user record type that can be diffed, persisted in
/// a plan, and handed to worker threads.
///
/// Implemented automatically; there is nothing to implement by hand.
pub trait Record: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync {}

impl<T> Record for T where T: Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync {}
