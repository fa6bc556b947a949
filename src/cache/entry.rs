//! Cache Entry Module
//!
//! Defines the record kept for every cached key, along with the staleness rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// One cached item: key, optional value and the metadata needed for expiry.
///
/// Entries are what a persistent store writes to its registry, so the field
/// names double as the on-disk record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// The cache key as given by the caller
    pub key: String,
    /// The stored value, absent when values are not kept in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Creation timestamp (Unix milliseconds), 0 = not time-tracked
    #[serde(default)]
    pub now: i64,
    /// TTL in seconds resolved at insertion, 0 = defer to the store default
    #[serde(default)]
    pub ttl: u64,
    /// Reserved size hint
    #[serde(default)]
    pub length: u64,
    /// Content hash of the serialized value (persistent stores only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    ///
    /// An entry without a TTL is not time-tracked and gets `now == 0`.
    ///
    /// # Arguments
    /// * `key` - The cache key
    /// * `value` - The value to retain, if any
    /// * `ttl` - Resolved TTL in seconds (0 = none)
    pub fn new(key: impl Into<String>, value: Option<Value>, ttl: u64) -> Self {
        Self {
            key: key.into(),
            value,
            now: if ttl > 0 { current_timestamp_ms() } else { 0 },
            ttl,
            length: 0,
            hash: None,
        }
    }

    /// Attaches a content hash.
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    // == Effective TTL ==
    /// Returns the TTL that applies to this entry, `None` meaning never stale.
    ///
    /// The entry's own TTL wins, then the store default.
    pub fn effective_ttl(&self, store_ttl: u64) -> Option<u64> {
        [self.ttl, store_ttl].into_iter().find(|ttl| *ttl > 0)
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived its effective TTL.
    ///
    /// Stale iff `(now - entry.now) / 1000 > ttl`, compared in milliseconds.
    /// Entries with `now == 0` are never stale.
    pub fn is_stale(&self, store_ttl: u64) -> bool {
        self.is_stale_at(store_ttl, current_timestamp_ms())
    }

    /// Staleness check against an explicit wall-clock reading.
    pub fn is_stale_at(&self, store_ttl: u64, now_ms: i64) -> bool {
        if self.now == 0 {
            return false;
        }

        match self.effective_ttl(store_ttl) {
            Some(ttl) => {
                let elapsed = i128::from(now_ms) - i128::from(self.now);
                elapsed > i128::from(ttl) * 1000
            }
            None => false,
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
