//! Per-record operations that make up a plan.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque unique identifier of a record across the local and remote sets.
pub type Key = String;

/// A single differing field between the old and new version of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Serialized field name.
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

/// Renders a field value for display.
///
/// Strings are shown without quotes and a missing value as `null`; every
/// other value uses its JSON text.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} => {}",
            self.field,
            format_value(&self.old_value),
            format_value(&self.new_value)
        )
    }
}

/// A record present locally but absent remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAddition<T> {
    pub key: Key,
    pub new: T,
}

/// A record present on both sides whose tracked fields differ.
///
/// `changes` is never empty for an update produced by the diff engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate<T> {
    pub key: Key,
    pub changes: Vec<FieldChange>,
    pub old: T,
    pub new: T,
}

impl<T> RecordUpdate<T> {
    /// `key, field: old => new, ...` with the key already formatted by the
    /// caller.
    pub fn describe(&self, formatted_key: &str) -> String {
        let changes = self
            .changes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("{formatted_key}, {changes}")
    }
}

/// A record present remotely but absent locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDeletion<T> {
    pub key: Key,
    pub old: T,
}

/// A local record that failed validation and was left out of the plan.
///
/// A remote record sharing the key is preserved untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordIgnored<T> {
    pub key: Key,
    pub record: T,
    pub reason: String,
}
