//! Plan computation: classifies every key of the local and remote sets.

use crate::error::{DiffError, DiffResult};
use crate::field::diff_records;
use planear_types::{
    Key, Plan, RecordAddition, RecordDeletion, RecordIgnored, RecordUpdate,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Compares local (desired) and remote (actual) records and produces a plan.
///
/// For every local key:
/// 1. the key is marked as seen, before validation
/// 2. a record failing `validate` becomes an ignore; a remote record with the
///    same key is neither updated nor deleted
/// 3. a key absent remotely becomes an addition
/// 4. a record differing from its remote counterpart becomes an update
///
/// Remote keys never seen locally become deletions. Buckets are sorted by key.
///
/// Records that compare unequal but whose serialized fields are all equal
/// (they differ only in skipped fields) are treated as unchanged.
pub fn compute_plan_diff<T, V>(
    local: &HashMap<Key, T>,
    remote: &HashMap<Key, T>,
    validate: V,
) -> DiffResult<Plan<T>>
where
    T: Clone + PartialEq + Serialize,
    V: Fn(&T) -> Result<(), String>,
{
    let mut plan = Plan::new();
    let mut seen: HashSet<&str> = HashSet::with_capacity(local.len());

    for (key, local_record) in local {
        seen.insert(key.as_str());

        if let Err(reason) = validate(local_record) {
            debug!(key = %key, reason = %reason, "Local record failed validation");
            plan.ignores.push(RecordIgnored {
                key: key.clone(),
                record: local_record.clone(),
                reason,
            });
            continue;
        }

        let Some(remote_record) = remote.get(key) else {
            plan.additions.push(RecordAddition {
                key: key.clone(),
                new: local_record.clone(),
            });
            continue;
        };

        if remote_record == local_record {
            continue;
        }

        let changes =
            diff_records(remote_record, local_record).map_err(|e| DiffError::Update {
                key: key.clone(),
                source: Box::new(e),
            })?;
        if changes.is_empty() {
            debug!(key = %key, "Records differ only in untracked fields");
            continue;
        }

        plan.updates.push(RecordUpdate {
            key: key.clone(),
            changes,
            old: remote_record.clone(),
            new: local_record.clone(),
        });
    }

    for (key, remote_record) in remote {
        if !seen.contains(key.as_str()) {
            plan.deletions.push(RecordDeletion {
                key: key.clone(),
                old: remote_record.clone(),
            });
        }
    }

    plan.additions.sort_by(|a, b| a.key.cmp(&b.key));
    plan.updates.sort_by(|a, b| a.key.cmp(&b.key));
    plan.deletions.sort_by(|a, b| a.key.cmp(&b.key));
    plan.ignores.sort_by(|a, b| a.key.cmp(&b.key));

    debug!(
        additions = plan.additions.len(),
        updates = plan.updates.len(),
        deletions = plan.deletions.len(),
        ignores = plan.ignores.len(),
        "Computed plan diff"
    );
    Ok(plan)
}
