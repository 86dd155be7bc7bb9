//! Cache Module
//!
//! Provides the in-process key/value cache with per-entry TTL expiration.

mod concurrent;
mod entry;
mod stats;
mod store;
mod value;


// Re-export public types
pub(crate) use concurrent::Shared;
pub use concurrent::Cache;
pub use entry::{current_timestamp_nanos, Entry, Expiration};
pub use stats::CacheStats;
pub use store::CacheStore;
pub use value::Value;
