//! Field-level change detection.

use crate::error::{DiffError, DiffResult};
use planear_types::FieldChange;
use serde::Serialize;
use serde_json::{Map, Value};

/// Compares two records of the same type and returns one [`FieldChange`] per
/// differing serialized field, in declaration order.
pub fn diff_records<T: Serialize>(old: &T, new: &T) -> DiffResult<Vec<FieldChange>> {
    let old = serde_json::to_value(old)?;
    let new = serde_json::to_value(new)?;
    diff_values(&old, &new)
}

/// Loosely-typed variant of [`diff_records`].
///
/// Both sides must be JSON objects. A field present on one side only is
/// compared against `null`.
pub fn diff_values(old: &Value, new: &Value) -> DiffResult<Vec<FieldChange>> {
    let (old_fields, new_fields) = match (old, new) {
        (Value::Object(o), Value::Object(n)) => (o, n),
        _ if kind_of(old) != kind_of(new) => {
            return Err(DiffError::ShapeMismatch {
                old: kind_of(old),
                new: kind_of(new),
            });
        }
        _ => return Err(DiffError::NotARecord(kind_of(old))),
    };

    let mut changes = Vec::new();
    for (field, old_value) in old_fields {
        let new_value = new_fields.get(field).unwrap_or(&Value::Null);
        if old_value != new_value {
            changes.push(FieldChange::new(field.as_str(), old_value.clone(), new_value.clone()));
        }
    }
    // Fields only the new side serialized (e.g. skip_serializing_if on the old side).
    for (field, new_value) in only_in(new_fields, old_fields) {
        if !new_value.is_null() {
            changes.push(FieldChange::new(field.as_str(), Value::Null, new_value.clone()));
        }
    }
    Ok(changes)
}

fn only_in<'a>(
    fields: &'a Map<String, Value>,
    other: &'a Map<String, Value>,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    fields.iter().filter(|(name, _)| !other.contains_key(name.as_str()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
