//! Custom error types for translation operations

use thiserror::Error;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The inference backend could not be reached or answered unusably
    #[error("Backend unavailable: {message}")]
    BackendUnavailable {
        message: String,
        /// Set only when the request never got an answer
        transient: bool,
    },

    /// Request timeout
    #[error("Backend did not respond within {timeout_ms} ms")]
    Timeout {
        timeout_ms: u64,
    },

    /// Nothing usable was left after cleaning the backend output
    #[error("Translation result is empty")]
    EmptyResponse,

    /// Rejected before reaching the backend
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
    },
}

impl TranslationError {
    /// Short machine-readable code used in HTTP error bodies
    pub fn code(&self) -> &'static str {
        match self {
            TranslationError::BackendUnavailable { .. } => "backend_unavailable",
            TranslationError::Timeout { .. } => "timeout",
            TranslationError::EmptyResponse => "empty_response",
            TranslationError::InvalidInput { .. } => "invalid_request",
            TranslationError::ConfigError { .. } => "config_error",
        }
    }

    /// Whether a single retry may help
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TranslationError::BackendUnavailable {
                transient: true,
                ..
            }
        )
    }

    /// The backend answered, but not with anything usable
    pub fn bad_reply(message: impl Into<String>) -> Self {
        TranslationError::BackendUnavailable {
            message: message.into(),
            transient: false,
        }
    }

    /// Classify a failed `send()` into the gateway taxonomy.
    pub fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            TranslationError::Timeout { timeout_ms }
        } else {
            TranslationError::BackendUnavailable {
                message: err.to_string(),
                transient: err.is_connect() || err.is_request(),
            }
        }
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
