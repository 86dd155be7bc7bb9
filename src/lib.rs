//! Memocache - An in-process key/value cache
//!
//! Provides thread-safe storage with per-entry TTL expiration, a background
//! expiry sweep and snapshot persistence.

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;
pub mod tasks;

pub use cache::{Cache, CacheStats, Entry, Expiration, Value};
pub use config::Config;
pub use error::{CacheError, Result};
