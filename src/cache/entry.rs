//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and expiration.
#[derive(Debug, Clone)]
pub struct Entry<T> {
    /// The stored value
    pub value: T,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl` - Time to live; `Duration::ZERO` means the entry never expires
    pub fn new(value: T, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            // A ttl past the clock's range never expires
            Instant::now().checked_add(ttl)
        };

        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is strictly after its
    /// expiration instant. Entries without an expiration never expire.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() > expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` once the expiration instant is reached
    /// - `Some(remaining)` while the entry is alive
    /// - `None` if the entry never expires
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}

impl<T: Default> Entry<T> {
    // == Flush ==
    /// Resets the value to its zero value in place; the expiration is kept.
    pub fn flush(&mut self) {
        self.value = T::default();
    }
}
