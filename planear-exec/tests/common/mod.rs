#![allow(dead_code)]

use planear_types::{Plan, RecordAddition, RecordDeletion, RecordIgnored, RecordUpdate, FieldChange};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io;
use std::sync::{Arc, Mutex};

// ── Log capture ──────────────────────────────────────────────────

/// In-memory writer for a `tracing_subscriber::fmt` subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

/// Runs `f` with a subscriber that records everything into the returned
/// buffer.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, LogBuffer) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer)
}

// ── Records and plans ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub value: i64,
}

pub fn row(id: &str, value: i64) -> Row {
    Row {
        id: id.to_string(),
        value,
    }
}

pub fn fmt_row(r: &Row) -> String {
    format!("{}={}", r.id, r.value)
}

pub fn make_addition(id: &str) -> RecordAddition<Row> {
    RecordAddition {
        key: id.to_string(),
        new: row(id, 1),
    }
}

pub fn make_update(id: &str) -> RecordUpdate<Row> {
    RecordUpdate {
        key: id.to_string(),
        changes: vec![FieldChange::new("value", json!(1), json!(2))],
        old: row(id, 1),
        new: row(id, 2),
    }
}

pub fn make_deletion(id: &str) -> RecordDeletion<Row> {
    RecordDeletion {
        key: id.to_string(),
        old: row(id, 1),
    }
}

pub fn make_ignored(id: &str) -> RecordIgnored<Row> {
    RecordIgnored {
        key: id.to_string(),
        record: row(id, -1),
        reason: "value must be non-negative".to_string(),
    }
}

pub fn make_plan(adds: &[&str], updates: &[&str], deletes: &[&str], ignores: &[&str]) -> Plan<Row> {
    Plan {
        additions: adds.iter().map(|k| make_addition(k)).collect(),
        updates: updates.iter().map(|k| make_update(k)).collect(),
        deletions: deletes.iter().map(|k| make_deletion(k)).collect(),
        ignores: ignores.iter().map(|k| make_ignored(k)).collect(),
    }
}

pub fn sorted_keys<I, S>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
    keys.sort();
    keys
}
