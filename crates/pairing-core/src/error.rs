//! Error types for Project Pairing

/// Result type alias using Project Pairing's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Project Pairing operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller-supplied input failed type or range checks
    #[error("invalid value for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Inference errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Missing, unreadable or inconsistent model artifact
    #[error("model artifact error: {0}")]
    Artifact(String),

    /// Dataset read/append errors
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding errors
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new validation error for a named field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new artifact error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
