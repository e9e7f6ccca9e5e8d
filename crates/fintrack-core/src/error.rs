//! Error types for fintrack-core
//!
//! Every failure that reaches a store, a fetch callback or the CLI is a
//! [`CoreError`]. Each variant maps to a stable [`ErrorCode`], a severity and
//! a set of suggestions so callers can turn it into a user-facing message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,
    /// Form or parameter validation failed
    ValidationError,
    /// Backend request failed
    RequestFailed,
    /// Backend answered with something we could not read
    InvalidResponse,
    /// Configuration error
    ConfigError,
    /// Unauthorized access
    Unauthorized,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotFound => write!(f, "NOT_FOUND"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::RequestFailed => write!(f, "REQUEST_FAILED"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for fintrack-core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    RequestFailed {
        message: String,
        status: Option<u16>,
    },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    /// Shorthand for a failed request without an HTTP status
    pub fn request(message: impl Into<String>) -> Self {
        CoreError::RequestFailed {
            message: message.into(),
            status: None,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::RequestFailed { .. } => ErrorCode::RequestFailed,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::Unauthorized => ErrorCode::Unauthorized,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotFound { .. } => ErrorSeverity::Info,
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::RequestFailed { .. } => ErrorSeverity::Error,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
            CoreError::Unauthorized => ErrorSeverity::Warning,
            CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NotFound { resource, .. } => {
                details = details.with_suggestion(format!(
                    "The {} may have been deleted. Reload the list and try again.",
                    resource
                ));
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details
                    .with_suggestion("Correct the highlighted field and submit again.".to_string());
            }
            CoreError::RequestFailed { status, .. } => {
                if let Some(status) = status {
                    details = details.with_detail(serde_json::json!({ "status": status }));
                }
                details = details.with_suggestion(
                    "Check that the backend is reachable (api.base_url).".to_string(),
                );
                details = details.with_suggestion(
                    "Repeat the action; requests are not retried automatically.".to_string(),
                );
            }
            CoreError::Unauthorized => {
                details = details
                    .with_suggestion("Set api.auth_token to a valid bearer token.".to_string());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<fintrack_config::ConfigError> for CoreError {
    fn from(error: fintrack_config::ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "fintrack::error",
            "ERROR [{}] {} - Operation: {} - Context: {}",
            error.code(),
            error,
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "fintrack::error",
            "WARNING: {} - Operation: {} - Context: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "NOT_FOUND");
        assert_eq!(ErrorCode::RequestFailed.to_string(), "REQUEST_FAILED");
        assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::validation("x").severity(), ErrorSeverity::Warning);
        assert_eq!(CoreError::request("x").severity(), ErrorSeverity::Error);
        assert_eq!(
            CoreError::InternalError { message: "x".to_string() }.severity(),
            ErrorSeverity::Critical
        );
    }

    #[test]
    fn test_message_passthrough() {
        // The backend's message is shown to the user as-is.
        let error = CoreError::RequestFailed {
            message: "Category already exists".to_string(),
            status: Some(409),
        };
        assert_eq!(error.to_string(), "Category already exists");

        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::RequestFailed);
        assert_eq!(details.details, Some(serde_json::json!({ "status": 409 })));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_not_found_details() {
        let error = CoreError::NotFound {
            resource: "budget".to_string(),
            id: "42".to_string(),
        };
        let details = error.to_details();
        assert!(details.message.contains("42"));
        assert!(details.suggestions[0].contains("budget"));
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CoreError = fintrack_config::ConfigError::IoError.into();
        assert_eq!(error.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("fetch_data")
            .with_data("page", serde_json::json!(2))
            .with_data("search", serde_json::json!("coffee"));

        assert_eq!(context.operation, "fetch_data");
        assert_eq!(context.data["page"], 2);
        assert_eq!(context.data["search"], "coffee");
    }
}
