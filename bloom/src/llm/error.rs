//! Generation call failures and their retry classification

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP 429; `retry_after` comes from the provider's header when present
    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<Duration> },

    #[error("Provider returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    #[error("No response within {0:?}")]
    Timeout(Duration),
}

impl LlmError {
    /// Map a non-success HTTP status to its error
    pub fn from_status(status: u16, message: String, retry_after: Option<Duration>) -> Self {
        if status == 429 {
            LlmError::RateLimited { retry_after }
        } else {
            LlmError::ApiError { status, message }
        }
    }

    /// Transient failure that another attempt may clear
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RateLimited { .. } | LlmError::Network(_) | LlmError::Timeout(_) => true,
            LlmError::ApiError { status, .. } => matches!(status, 408 | 500 | 502 | 503 | 504),
            LlmError::InvalidResponse(_) => false,
        }
    }

    /// Wait requested by the provider before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            LlmError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}
