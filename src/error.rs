//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for stores, registries and the cache façade.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is empty or blank after normalization
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// TTL was supplied but could not be read as a number of seconds
    #[error("Invalid ttl: {0}")]
    InvalidTtl(String),

    /// Construction-time options were rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The external property registry failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// A value or record could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CacheError::InvalidKey("key must be a non-empty string".to_string());
        assert_eq!(err.to_string(), "Invalid key: key must be a non-empty string");

        let err = CacheError::InvalidConfiguration("name must be a string".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: name must be a string");
    }

    #[test]
    fn test_serde_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: CacheError = parse.unwrap_err().into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }
}
