//! A JSON file standing in for the remote system.
//!
//! Records are held in memory while a plan is applied and written back in
//! one go by [`JsonRemote::persist`], which the demo uses as its finalize
//! step.

use crate::user::{UserRecord, extract_key};
use anyhow::{Context, Result, bail};
use planear::{Key, RecordAddition, RecordDeletion, RecordUpdate};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

pub struct JsonRemote {
    path: PathBuf,
    records: Mutex<BTreeMap<Key, UserRecord>>,
    fail_keys: HashSet<Key>,
}

impl JsonRemote {
    /// Reads the file at `path`. A missing file is an empty remote.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(contents) => {
                let users: Vec<UserRecord> = serde_json::from_str(&contents)
                    .with_context(|| format!("failed to parse remote file {:?}", path))?;
                users.into_iter().map(|u| (extract_key(&u), u)).collect()
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No remote file at {:?}, starting empty", path);
                BTreeMap::new()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read remote file {:?}", path));
            }
        };

        Ok(Self {
            path,
            records: Mutex::new(records),
            fail_keys: HashSet::new(),
        })
    }

    /// Makes every operation on these keys fail, for exercising retries.
    pub fn fail_on(mut self, keys: impl IntoIterator<Item = Key>) -> Self {
        self.fail_keys.extend(keys);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> HashMap<Key, UserRecord> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn add(&self, addition: &RecordAddition<UserRecord>) -> Result<()> {
        self.check(&addition.key)?;
        let mut records = self.lock();
        if records.contains_key(&addition.key) {
            bail!("record {} already exists", addition.key);
        }
        records.insert(addition.key.clone(), addition.new.clone());
        debug!(key = %addition.key, "added record");
        Ok(())
    }

    pub fn update(&self, update: &RecordUpdate<UserRecord>) -> Result<()> {
        self.check(&update.key)?;
        match self.lock().get_mut(&update.key) {
            Some(record) => *record = update.new.clone(),
            None => bail!("record {} does not exist", update.key),
        }
        debug!(key = %update.key, "updated record");
        Ok(())
    }

    pub fn delete(&self, deletion: &RecordDeletion<UserRecord>) -> Result<()> {
        self.check(&deletion.key)?;
        if self.lock().remove(&deletion.key).is_none() {
            bail!("record {} does not exist", deletion.key);
        }
        debug!(key = %deletion.key, "deleted record");
        Ok(())
    }

    /// Writes the current records back to the file, ordered by key.
    pub fn persist(&self) -> Result<()> {
        let users: Vec<UserRecord> = self.lock().values().cloned().collect();
        let json = serde_json::to_string_pretty(&users)?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write remote file {:?}", self.path))?;
        info!("Wrote {} record(s) to {:?}", users.len(), self.path);
        Ok(())
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.fail_keys.contains(key) {
            bail!("simulated failure for {key}");
        }
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<Key, UserRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
