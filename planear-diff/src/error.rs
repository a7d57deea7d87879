//! Error types for the diff engine.

use planear_types::Key;
use thiserror::Error;

/// Result type for diff operations.
pub type DiffResult<T> = Result<T, DiffError>;

/// Errors that abort a diff. No partial plan is ever returned.
#[derive(Debug, Error)]
pub enum DiffError {
    /// The two sides do not share a shape.
    #[error("type mismatch: {old} vs {new}")]
    ShapeMismatch {
        old: &'static str,
        new: &'static str,
    },

    /// A record did not serialize to a field map.
    #[error("record must serialize to an object, got {0}")]
    NotARecord(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Field-level diff of an update failed.
    #[error("error generating update diff for key {key:?}: {source}")]
    Update {
        key: Key,
        #[source]
        source: Box<DiffError>,
    },
}
