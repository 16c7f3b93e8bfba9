//! Configuration Module
//!
//! Construction-time settings for a cache instance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::KeyEncoding;

/// Cleanup interval used when auto cleanup is enabled with a zero interval.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Cache configuration parameters.
///
/// Applied once when the cache is built. Deserializes with defaults for any
/// missing field, so hosts can embed it in their own configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Run a background sweep that removes expired entries
    pub auto_cleanup: bool,
    /// Interval between sweeps; zero falls back to [`DEFAULT_CLEANUP_INTERVAL`]
    pub auto_cleanup_interval: Duration,
    /// Composite key codec
    pub key_encoding: KeyEncoding,
}

impl CacheConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables background cleanup every `interval`.
    pub fn with_auto_cleanup(mut self, interval: Duration) -> Self {
        self.auto_cleanup = true;
        self.auto_cleanup_interval = interval;
        self
    }

    /// Switches to the legacy delimiter-joined key codec.
    pub fn with_key_separator(mut self, separator: impl Into<String>) -> Self {
        self.key_encoding = KeyEncoding::Delimited(separator.into());
        self
    }

    /// Returns the sweep interval to use, or None when cleanup is disabled.
    pub fn effective_cleanup_interval(&self) -> Option<Duration> {
        if !self.auto_cleanup {
            return None;
        }
        if self.auto_cleanup_interval.is_zero() {
            Some(DEFAULT_CLEANUP_INTERVAL)
        } else {
            Some(self.auto_cleanup_interval)
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            auto_cleanup: false,
            auto_cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            key_encoding: KeyEncoding::Structured,
        }
    }
}
