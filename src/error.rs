//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Key-bearing variants carry the key parts exactly as the caller supplied them.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key not found in cache
    #[error("Key not found: {0:?}")]
    NotFound(Vec<String>),

    /// Key is present but its TTL has elapsed
    #[error("Key expired: {0:?}")]
    Expired(Vec<String>),

    /// Prefix lookup matched no stored key
    #[error("No key matches prefix: {0:?}")]
    NoMatch(Vec<String>),

    /// Background cleanup worker could not be started
    #[error("Cleanup scheduler failed to start: {0}")]
    Scheduler(#[from] std::io::Error),
}

impl CacheError {
    /// Returns true for [`CacheError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, CacheError::NotFound(_))
    }

    /// Returns true for [`CacheError::Expired`].
    pub fn is_expired(&self) -> bool {
        matches!(self, CacheError::Expired(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
