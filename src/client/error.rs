//! Client error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid authorization token")]
    InvalidToken,

    #[error("Service Manager returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Error body returned by the Service Manager
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub description: String,
}

impl ErrorResponse {
    pub(crate) fn message(self) -> String {
        match (self.error.is_empty(), self.description.is_empty()) {
            (_, false) => self.description,
            (false, true) => self.error,
            (true, true) => "unknown error".to_string(),
        }
    }
}
