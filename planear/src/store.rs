//! JSON persistence for plans and execution reports.

use crate::error::{PlanearError, PlanearResult};
use planear_types::{ExecutionReport, Plan};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Writes a plan as pretty-printed JSON, creating parent directories.
pub fn save_plan<T: Serialize>(path: impl AsRef<Path>, plan: &Plan<T>) -> PlanearResult<()> {
    write_json(path.as_ref(), plan)
}

/// Reads a plan written by [`save_plan`].
///
/// A missing file is an empty plan. A file that does not parse is
/// [`PlanearError::MalformedPlan`].
pub fn load_plan<T: DeserializeOwned>(path: impl AsRef<Path>) -> PlanearResult<Plan<T>> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "no plan file found, nothing to apply");
            return Ok(Plan::new());
        }
        Err(e) => return Err(PlanearError::io(path, e)),
    };

    serde_json::from_str(&contents).map_err(|source| PlanearError::MalformedPlan {
        path: path.to_path_buf(),
        source,
    })
}

/// Deletes a plan file left over from an earlier run.
///
/// Returns whether a file was removed. Directories are left alone.
pub fn remove_stale_plan(path: impl AsRef<Path>) -> PlanearResult<bool> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(false),
        Ok(_) => {
            fs::remove_file(path).map_err(|e| PlanearError::io(path, e))?;
            warn!(path = %path.display(), "removed stale plan file");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PlanearError::io(path, e)),
    }
}

/// Writes an execution report as pretty-printed JSON for auditing.
pub fn save_report<T: Serialize>(
    path: impl AsRef<Path>,
    report: &ExecutionReport<T>,
) -> PlanearResult<()> {
    write_json(path.as_ref(), report)
}

fn write_json<V: Serialize>(path: &Path, value: &V) -> PlanearResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PlanearError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| PlanearError::io(path, e))?;
    debug!(path = %path.display(), "wrote JSON file");
    Ok(())
}
