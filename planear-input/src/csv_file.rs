use crate::error::{InputError, InputResult};
use serde::de::DeserializeOwned;
use std::path::Path;

fn reader(path: &Path, has_headers: bool) -> InputResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

fn csv_error(path: &Path, source: csv::Error) -> InputError {
    InputError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads every row of a CSV file, header included, as trimmed strings.
///
/// A file with no rows at all is an [`InputError::EmptyFile`].
pub fn read_csv_rows(path: impl AsRef<Path>) -> InputResult<Vec<Vec<String>>> {
    let path = path.as_ref();
    let mut rows = Vec::new();
    for record in reader(path, false)?.records() {
        let record = record.map_err(|source| csv_error(path, source))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    if rows.is_empty() {
        return Err(InputError::EmptyFile(path.to_path_buf()));
    }
    Ok(rows)
}

/// Decodes every data row of a CSV file into `T`, matching columns to
/// fields by header name.
///
/// Extra columns are ignored. A column `T` requires but the header lacks is
/// an error. Empty cells decode to `None` for `Option` fields. A header-only
/// file yields no records.
pub fn decode_csv_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> InputResult<Vec<T>> {
    let path = path.as_ref();
    let mut reader = reader(path, true)?;

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?;
    if headers.is_empty() {
        return Err(InputError::EmptyFile(path.to_path_buf()));
    }

    reader
        .deserialize()
        .map(|row| row.map_err(|source| csv_error(path, source)))
        .collect()
}
