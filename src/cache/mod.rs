//! Cache Module
//!
//! Provides the in-memory cache engine: composite key codec, entries with
//! TTL expiration, the locked store and the public facade.

mod entry;
mod facade;
mod key;
mod store;


// Re-export public types
pub use entry::Entry;
pub use facade::Cache;
pub use key::KeyEncoding;
pub use store::{Lookup, Store};
