use crate::csv_file::decode_csv_file;
use crate::error::InputResult;
use planear_types::Key;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Loads every `.csv` file under `dir` (recursively) into one map keyed by
/// `extract_key`.
///
/// Files are visited in file-name order; when two rows share a key the one
/// read later wins.
pub fn load_csv_directory<T, F>(dir: impl AsRef<Path>, extract_key: F) -> InputResult<HashMap<Key, T>>
where
    T: DeserializeOwned,
    F: Fn(&T) -> Key,
{
    let mut records = HashMap::new();

    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }

        let rows: Vec<T> = decode_csv_file(entry.path())?;
        debug!(path = %entry.path().display(), rows = rows.len(), "loaded CSV file");
        for row in rows {
            records.insert(extract_key(&row), row);
        }
    }

    Ok(records)
}
