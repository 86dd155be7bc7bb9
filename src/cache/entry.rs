//! Cache Entry Module
//!
//! Defines individual cache entries and the TTL policy used to build them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Expiration ==
/// TTL requested for a write.
///
/// Mirrors the classic duration sentinels: `Never` is `-1`, `Default` is `0`
/// and any positive duration is `After`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// The entry never expires
    Never,
    /// Use the cache's default TTL
    #[default]
    Default,
    /// The entry expires this long after the write
    After(Duration),
}

impl Expiration {
    /// Builds an expiration from a signed number of seconds.
    ///
    /// Negative means never, zero means use the default, positive is a TTL.
    pub fn from_secs(secs: i64) -> Self {
        match secs {
            s if s < 0 => Expiration::Never,
            0 => Expiration::Default,
            s => Expiration::After(Duration::from_secs(s.unsigned_abs())),
        }
    }

    // == Resolve ==
    /// Resolves this request against the cache default.
    ///
    /// `Default` is substituted first; anything that is still not a positive
    /// duration afterwards means "never expires" and yields `None`.
    pub fn resolve(self, default: Expiration) -> Option<Duration> {
        let resolved = match self {
            Expiration::Default => default,
            other => other,
        };

        match resolved {
            Expiration::After(ttl) if !ttl.is_zero() => Some(ttl),
            _ => None,
        }
    }

    /// Absolute deadline in Unix nanoseconds for a write made at `now`.
    pub fn deadline(self, default: Expiration, now: i64) -> Option<i64> {
        self.resolve(default).map(|ttl| {
            i64::try_from(ttl.as_nanos())
                .map(|nanos| now.saturating_add(nanos))
                .unwrap_or(i64::MAX)
        })
    }
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

// == Cache Entry ==
/// A stored value together with its absolute expiration.
///
/// Entries are never mutated in place; overwriting a key swaps the whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry<V> {
    value: V,
    /// Expiration timestamp (Unix nanoseconds), None = no expiration
    expires_at: Option<i64>,
}

impl<V> Entry<V> {
    // == Constructor ==
    /// Creates an entry with an explicit absolute deadline.
    pub fn with_deadline(value: V, expires_at: Option<i64>) -> Self {
        Self { value, expires_at }
    }

    /// Creates an entry whose deadline is resolved from `ttl` at the current time.
    pub fn new(value: V, ttl: Expiration, default_ttl: Expiration) -> Self {
        let expires_at = ttl.deadline(default_ttl, current_timestamp_nanos());
        Self::with_deadline(value, expires_at)
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Raw deadline in Unix nanoseconds.
    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    /// Deadline as a UTC timestamp.
    pub fn expires_at_utc(&self) -> Option<DateTime<Utc>> {
        self.expires_at.map(DateTime::from_timestamp_nanos)
    }

    // == Is Expired ==
    /// Checks expiry against a caller-supplied reference time.
    ///
    /// Strictly later than the deadline counts as expired; an entry checked
    /// at exactly its deadline is still live.
    pub fn is_expired_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now > expires,
            None => false,
        }
    }

    /// Checks expiry against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_nanos())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// Returns `Some(Duration::ZERO)` once the deadline has passed.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_nanos();
            u64::try_from(expires.saturating_sub(now))
                .map(Duration::from_nanos)
                .unwrap_or(Duration::ZERO)
        })
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in nanoseconds.
pub fn current_timestamp_nanos() -> i64 {
    // Only out of range after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    const SECOND: i64 = 1_000_000_000;

    #[test]
    fn test_entry_never_expires() {
        let entry = Entry::new("value", Expiration::Never, Expiration::Default);

        assert!(entry.expires_at().is_none());
        assert!(!entry.is_expired());
        assert!(!entry.is_expired_at(i64::MAX));
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = Entry::new("value", Duration::from_secs(60).into(), Expiration::Never);

        assert!(entry.expires_at().is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_is_strict() {
        let entry = Entry::with_deadline("value", Some(10 * SECOND));

        assert!(!entry.is_expired_at(10 * SECOND - 1));
        assert!(!entry.is_expired_at(10 * SECOND));
        assert!(entry.is_expired_at(10 * SECOND + 1));
    }

    #[test]
    fn test_entry_expiration_elapses() {
        let entry = Entry::new("value", Duration::from_millis(50).into(), Expiration::Never);

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(80));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_default_substitution() {
        let default = Expiration::After(Duration::from_secs(5));

        assert_eq!(Expiration::Default.resolve(default), Some(Duration::from_secs(5)));
        assert_eq!(Expiration::Never.resolve(default), None);
        assert_eq!(
            Expiration::After(Duration::from_secs(1)).resolve(default),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_non_positive_default_means_never() {
        assert_eq!(Expiration::Default.resolve(Expiration::Default), None);
        assert_eq!(Expiration::Default.resolve(Expiration::Never), None);
        assert_eq!(
            Expiration::Default.resolve(Expiration::After(Duration::ZERO)),
            None
        );
        assert_eq!(Expiration::After(Duration::ZERO).resolve(Expiration::Never), None);
    }

    #[test]
    fn test_deadline_is_relative_to_now() {
        let ttl = Expiration::After(Duration::from_secs(3));
        assert_eq!(ttl.deadline(Expiration::Never, 7 * SECOND), Some(10 * SECOND));
        assert_eq!(Expiration::Never.deadline(Expiration::Never, 7 * SECOND), None);
    }

    #[test]
    fn test_deadline_saturates() {
        let ttl = Expiration::After(Duration::from_secs(u64::MAX));
        assert_eq!(ttl.deadline(Expiration::Never, SECOND), Some(i64::MAX));
    }

    #[test]
    fn test_from_secs_sentinels() {
        assert_eq!(Expiration::from_secs(-1), Expiration::Never);
        assert_eq!(Expiration::from_secs(0), Expiration::Default);
        assert_eq!(
            Expiration::from_secs(30),
            Expiration::After(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = Entry::new("value", Duration::from_secs(10).into(), Expiration::Never);

        let remaining = entry.ttl_remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired_and_never() {
        let expired = Entry::with_deadline("value", Some(SECOND));
        assert_eq!(expired.ttl_remaining(), Some(Duration::ZERO));

        let forever = Entry::with_deadline("value", None);
        assert!(forever.ttl_remaining().is_none());
    }

    #[test]
    fn test_expires_at_utc() {
        let entry = Entry::with_deadline("value", Some(SECOND));
        assert_eq!(entry.expires_at_utc().unwrap().timestamp(), 1);
    }
}
