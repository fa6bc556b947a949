//! Store Module
//!
//! The contract every backing store satisfies, plus the two built-in stores.
//!
//! Every store resolves staleness and eviction internally and hands plain
//! values back to callers:
//! - `get`/`entry` reap stale entries lazily
//! - `has`/`keys`/`size` report what is indexed, stale or not
//! - `set` evicts at most one oldest-inserted entry when over the maximum

mod memory;
mod persistent;

pub use memory::MemoryStore;
pub use persistent::PersistentPropertyStore;

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::{CacheStats, Entry};
use crate::error::{CacheError, Result};

// == Set Outcome ==
/// What a successful `set` reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetOutcome {
    /// The entry was stored
    Stored,
    /// The entry was stored and mirrored externally; carries its content hash
    Persisted { hash: String },
}

impl SetOutcome {
    /// Content hash of the stored value, for stores that compute one.
    pub fn hash(&self) -> Option<&str> {
        match self {
            SetOutcome::Stored => None,
            SetOutcome::Persisted { hash } => Some(hash),
        }
    }
}

// == Store Contract ==
/// Capability set every backing store implements with identical semantics.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns the live value for `key`; a stale entry is deleted and reported absent.
    async fn get(&mut self, key: &str) -> Result<Option<Value>>;

    /// Returns the live entry record for `key`, with the same lazy expiry as `get`.
    async fn entry(&mut self, key: &str) -> Result<Option<Entry>>;

    /// Creates or replaces the entry for `key`.
    ///
    /// A `ttl` of `None` or `Some(0)` falls back to the store default.
    async fn set(&mut self, key: &str, value: Value, ttl: Option<u64>) -> Result<SetOutcome>;

    /// Removes the entry for `key`; absent keys are not an error.
    async fn delete(&mut self, key: &str) -> Result<()>;

    /// Whether an entry is indexed for `key`. Staleness is not checked.
    async fn has(&self, key: &str) -> Result<bool>;

    /// Indexed keys, oldest insertion first.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Removes every entry.
    async fn clear(&mut self) -> Result<()>;

    /// Number of indexed entries.
    fn size(&self) -> usize;

    /// Rebuilds in-memory state from durable storage. No-op for volatile stores.
    async fn refresh(&mut self) -> Result<()> {
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

// == Key Helpers ==
/// Rejects keys that are empty once normalized.
pub fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidKey(
            "key must be a non-empty string".to_string(),
        ));
    }
    Ok(())
}

/// Lowercases and trims `key`, collapsing whitespace runs to single underscores.
pub fn normalize_key(key: &str) -> String {
    key.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Resolves a per-call TTL override against the store default.
pub(crate) fn resolve_ttl(override_ttl: Option<u64>, store_ttl: u64) -> u64 {
    override_ttl.filter(|ttl| *ttl > 0).unwrap_or(store_ttl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("user:1").is_ok());
        assert!(matches!(validate_key(""), Err(CacheError::InvalidKey(_))));
        assert!(matches!(validate_key(" \t "), Err(CacheError::InvalidKey(_))));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("  User Profile  "), "user_profile");
        assert_eq!(normalize_key("a \t\n b"), "a_b");
        assert_eq!(normalize_key("Already_Flat"), "already_flat");
    }

    #[test]
    fn test_resolve_ttl() {
        assert_eq!(resolve_ttl(None, 300), 300);
        assert_eq!(resolve_ttl(Some(0), 300), 300);
        assert_eq!(resolve_ttl(Some(5), 300), 5);
        assert_eq!(resolve_ttl(None, 0), 0);
    }

    #[test]
    fn test_set_outcome_hash() {
        assert_eq!(SetOutcome::Stored.hash(), None);
        let outcome = SetOutcome::Persisted {
            hash: "abc".to_string(),
        };
        assert_eq!(outcome.hash(), Some("abc"));
    }
}
