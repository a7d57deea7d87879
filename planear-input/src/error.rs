use std::path::PathBuf;
use thiserror::Error;

pub type InputResult<T> = Result<T, InputError>;

#[derive(Debug, Error)]
pub enum InputError {
    /// The file has no header row.
    #[error("empty CSV file: {}", .0.display())]
    EmptyFile(PathBuf),

    /// The file could not be opened, parsed, or decoded into the record type.
    #[error("failed to load CSV file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}
