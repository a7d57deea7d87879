//! Diff engine for Planear.
//!
//! Compares a local (desired) record set against a remote (actual) record set
//! and classifies every key into an addition, update, deletion, or ignore.
//!
//! # Field-level changes
//!
//! Records are compared field by field through their serde representation:
//! - the serialized field name is the name reported in a [`FieldChange`]
//! - `#[serde(rename = "...")]` changes that name
//! - `#[serde(skip)]` removes a field from comparison entirely
//! - fields are reported in declaration order
//! - `Option` fields compare by value (`None == None`, `Some(x) == Some(y)`
//!   iff `x == y`)
//!
//! # Example
//!
//! ```
//! use planear_diff::compute_plan_diff;
//! use serde::{Deserialize, Serialize};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let local = HashMap::from([("u1".to_string(), User { name: "A".into() })]);
//! let remote = HashMap::from([("u1".to_string(), User { name: "B".into() })]);
//!
//! let plan = compute_plan_diff(&local, &remote, |_| Ok(())).unwrap();
//! assert_eq!(plan.updates.len(), 1);
//! assert_eq!(plan.updates[0].changes[0].field, "name");
//! ```
//!
//! [`FieldChange`]: planear_types::FieldChange

mod error;
mod field;
mod plan;

pub use error::{DiffError, DiffResult};
pub use field::{diff_records, diff_values};
pub use plan::compute_plan_diff;
