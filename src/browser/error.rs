use std::time::Duration;

use thiserror::Error;

/// Why a listing request failed. Every variant is recoverable: the browser
/// shows [`FetchError::user_message`] inline and stays navigable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("failed to reach listing service: {0}")]
    Network(String),
    #[error("listing service answered {code}: {message}")]
    Status { code: u16, message: String },
    #[error("malformed listing response: {0}")]
    Decode(String),
    #[error("listing timed out after {0:?}")]
    Timeout(Duration),
    #[error("object store error: {0}")]
    Backend(String),
}

impl FetchError {
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Network(_) => "Failed to connect to the library.".to_string(),
            FetchError::Status { message, .. } if !message.trim().is_empty() => message.clone(),
            FetchError::Status { code, .. } => format!("Failed to load library (HTTP {code})."),
            FetchError::Decode(_) => "Failed to load library.".to_string(),
            FetchError::Timeout(_) => "The library did not respond in time.".to_string(),
            FetchError::Backend(message) => message.clone(),
        }
    }
}
