use mms_core::CoreError;
use thiserror::Error;

use crate::status::status_message;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors raised while talking to the backend over HTTP
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{message} (HTTP {status}): {url}")]
    Status {
        status: u16,
        message: &'static str,
        url: String,
    },

    #[error("Request failed: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Empty response: {0}")]
    Empty(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl ClientError {
    pub fn from_status(status: u16, body: &str, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: status_message(status, body),
            url: url.into(),
        }
    }
}

impl From<ClientError> for CoreError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Status { status: 404, url, .. } => CoreError::NotFound(url),
            ClientError::Status {
                status, message, ..
            } => CoreError::Http {
                status,
                message: message.to_string(),
            },
            ClientError::Empty(url) => CoreError::NotFound(url),
            ClientError::Network(msg) => CoreError::Transport(msg),
            ClientError::InvalidResponse(msg) => CoreError::MalformedPayload(msg),
            ClientError::ClientBuild(msg) => CoreError::Configuration(msg),
        }
    }
}
