//! Error type shared by every stage of the conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while converting records to JSON-LD.
///
/// `Parse`, `Mapping` and `OutputDir` are fatal for a whole run. The
/// remaining variants concern a single record and are subject to the
/// caller's [`FailurePolicy`](crate::FailurePolicy).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Parse error in {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid mapping specification: {0}")]
    Mapping(String),

    #[error("Failed to reset output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record {record}: no identifier starts with '{prefix}' (found {found:?})")]
    IdentifierNotFound {
        record: usize,
        prefix: String,
        found: Vec<String>,
    },

    #[error("Record {record}: identifier '{identifier}' cannot name a file (contains a path separator)")]
    InvalidIdentifier { record: usize, identifier: String },

    #[error("Record {record}: identifier '{identifier}' was already written by record {first_record}")]
    DuplicateIdentifier {
        record: usize,
        identifier: String,
        first_record: usize,
    },

    #[error("Failed to serialize document '{identifier}': {source}")]
    Serialization {
        identifier: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write '{identifier}' to {}: {source}", .path.display())]
    Write {
        identifier: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// True for errors that only concern one record.
    pub fn is_per_record(&self) -> bool {
        matches!(
            self,
            ConvertError::IdentifierNotFound { .. }
                | ConvertError::InvalidIdentifier { .. }
                | ConvertError::DuplicateIdentifier { .. }
                | ConvertError::Serialization { .. }
                | ConvertError::Write { .. }
        )
    }
}
