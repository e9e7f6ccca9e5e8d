//! Error types for the REST client

use fintrack_core::CoreError;
use thiserror::Error;

/// Message used when the backend gives no better explanation
pub const REQUEST_FAILED: &str = "Request failed";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    /// Connection, timeout or other transport failure
    #[error("{0}")]
    Transport(String),

    /// Non-2xx answer; `message` is the body's `message` field when present
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            log::debug!(target: "fintrack::client", "transport error: {}", error);
            ApiError::Transport(REQUEST_FAILED.to_string())
        }
    }
}

impl From<ApiError> for CoreError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Status { status, message } => CoreError::RequestFailed {
                message,
                status: Some(status),
            },
            ApiError::Transport(message) => CoreError::RequestFailed {
                message,
                status: None,
            },
            ApiError::Decode(message) => CoreError::InvalidResponse { message },
            error @ (ApiError::InvalidBaseUrl { .. } | ApiError::ClientBuild(_)) => {
                CoreError::ConfigError {
                    message: error.to_string(),
                }
            }
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
