//! Memory Store Module
//!
//! In-process store: insertion-ordered index with lazy TTL expiry and
//! oldest-first eviction.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheStats, Entry, EntryIndex};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::store::{resolve_ttl, validate_key, SetOutcome, Store};

// == Memory Store ==
/// Volatile store backed by an insertion-ordered key→Entry index.
#[derive(Debug)]
pub struct MemoryStore {
    index: EntryIndex,
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max: usize,
    /// Default TTL in seconds, 0 = no expiry
    ttl: u64,
    save_value_in_memory: bool,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a new MemoryStore.
    ///
    /// # Arguments
    /// * `ttl` - Default TTL in seconds (0 = no expiry)
    /// * `max` - Maximum number of entries (0 = unbounded)
    pub fn new(ttl: u64, max: usize) -> Self {
        Self {
            index: EntryIndex::new(),
            stats: CacheStats::new(),
            max,
            ttl,
            save_value_in_memory: true,
        }
    }

    /// Creates a MemoryStore from shared configuration; `name` and `prefix` are ignored.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self {
            save_value_in_memory: config.save_value_in_memory,
            ..Self::new(config.ttl, config.max)
        }
    }

    /// Looks up `key`, reaping it if stale.
    fn live_entry(&mut self, key: &str) -> Option<&Entry> {
        let Some(entry) = self.index.get(key) else {
            debug!("cache miss ({key})");
            self.stats.record_miss();
            return None;
        };

        if entry.is_stale(self.ttl) {
            debug!("cache miss ({key}): entry expired");
            self.index.remove(key);
            self.stats.record_expiration();
            return None;
        }

        debug!("cache hit ({key})");
        self.stats.record_hit();
        self.index.get(key)
    }

    fn evict_if_over_max(&mut self) {
        if self.max == 0 || self.index.len() <= self.max {
            return;
        }

        if let Some(oldest) = self.index.oldest_key().cloned() {
            self.index.remove(&oldest);
            self.stats.record_eviction();
            debug!("evicted oldest entry ({oldest})");
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    // == Get ==
    async fn get(&mut self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;

        Ok(self.live_entry(key).and_then(|entry| entry.value.clone()))
    }

    async fn entry(&mut self, key: &str) -> Result<Option<Entry>> {
        validate_key(key)?;
        Ok(self.live_entry(key).cloned())
    }

    // == Set ==
    async fn set(&mut self, key: &str, value: Value, ttl: Option<u64>) -> Result<SetOutcome> {
        validate_key(key)?;

        let ttl = resolve_ttl(ttl, self.ttl);
        let value = self.save_value_in_memory.then_some(value);

        // Replacing re-inserts the key as the newest
        self.index.insert(Entry::new(key, value, ttl));
        self.evict_if_over_max();

        Ok(SetOutcome::Stored)
    }

    // == Delete ==
    async fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.index.remove(key);
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.index.contains(key))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.index.keys())
    }

    async fn clear(&mut self) -> Result<()> {
        self.index.clear();
        Ok(())
    }

    fn size(&self) -> usize {
        self.index.len()
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }
}
