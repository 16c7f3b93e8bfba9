//! Mini Memcache - An embeddable in-memory cache
//!
//! Generic, thread-safe key-value cache with composite keys, per-entry TTL
//! expiration, prefix lookup and an optional background cleanup sweep.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, KeyEncoding};
pub use config::{CacheConfig, DEFAULT_CLEANUP_INTERVAL};
pub use error::{CacheError, Result};
