//! Error types for MMS element access

use thiserror::Error;

/// Core error type for element store operations
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{message} (HTTP {status})")]
    Http { status: u16, message: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type alias for element store operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;
