//! Error types for the Conjure library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Conjure operations.
#[derive(Debug, Error)]
pub enum ConjureError {
    /// An edit referenced a question id or name that is not in the set.
    #[error("Unknown question: '{reference}'")]
    UnknownQuestion { reference: String },

    /// A rename would give two questions the same name.
    #[error("Duplicate question name: '{name}'")]
    DuplicateName { name: String },

    /// A question set failed its post-operation consistency check.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// A field update carried a value of the wrong shape, or an unknown key.
    #[error("Invalid value for '{field}': {message}")]
    InvalidFieldValue { field: String, message: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to convert.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Respondent selection could not be satisfied.
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConjureError {
    pub(crate) fn unknown(reference: impl Into<String>) -> Self {
        ConjureError::UnknownQuestion {
            reference: reference.into(),
        }
    }

    pub(crate) fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConjureError::InvalidFieldValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error was raised by the question-edit engine, as opposed
    /// to loading or finalization.
    pub fn is_edit_error(&self) -> bool {
        matches!(
            self,
            ConjureError::UnknownQuestion { .. }
                | ConjureError::DuplicateName { .. }
                | ConjureError::InvariantViolation(_)
                | ConjureError::InvalidFieldValue { .. }
        )
    }
}

/// Result type alias for Conjure operations.
pub type Result<T> = std::result::Result<T, ConjureError>;
