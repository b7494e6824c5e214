use mms_core::CoreError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Malformed table payload: {0}")]
    MalformedPayload(String),

    #[error("Element store returned {received} records for {requested} ids")]
    BatchMismatch { requested: usize, received: usize },

    #[error("Element store error: {0}")]
    Store(CoreError),
}

impl ServiceError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(what) => Self::NotFound(what),
            CoreError::MalformedPayload(msg) => Self::MalformedPayload(msg),
            other => Self::Store(other),
        }
    }
}
