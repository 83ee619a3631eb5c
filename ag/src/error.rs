//! Agronomy error types

use thiserror::Error;

/// Faults raised by the deterministic engines
#[derive(Debug, Error)]
pub enum AgronomyError {
    /// Neither the requested key nor the table's fallback row exists
    #[error("No row for '{key}' in {table} table (fallback row '{fallback}' also missing)")]
    LookupMiss {
        table: &'static str,
        key: String,
        fallback: String,
    },

    /// A required combination of optional parameters was not supplied
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl AgronomyError {
    /// Check if this is a reference-table miss
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, AgronomyError::LookupMiss { .. })
    }
}

pub type Result<T> = std::result::Result<T, AgronomyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_miss_message() {
        let err = AgronomyError::LookupMiss {
            table: "npk",
            key: "quinoa".to_string(),
            fallback: "general".to_string(),
        };
        assert!(err.is_lookup_miss());
        let msg = err.to_string();
        assert!(msg.contains("quinoa"));
        assert!(msg.contains("general"));
    }

    #[test]
    fn test_invalid_argument_is_not_lookup_miss() {
        let err = AgronomyError::InvalidArgument("plough_depth is required".to_string());
        assert!(!err.is_lookup_miss());
        assert!(err.to_string().starts_with("Invalid argument"));
    }
}
