//! Persistent Property Store Module
//!
//! Mirrors entries into a namespaced [`PropertyRegistry`] so cached data
//! survives restarts. Reads are served from the in-memory index only; the
//! registry is written through on every change and read back on refresh.
//!
//! Registry keys have the form `prefix + name + "_" + normalized(key)`, which
//! lets a refresh find this instance's records by prefix alone.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{content_hash, current_timestamp_ms, CacheStats, Entry, EntryIndex};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::registry::PropertyRegistry;
use crate::store::{normalize_key, resolve_ttl, validate_key, SetOutcome, Store};

// == Persistent Property Store ==
/// Store whose entries are written through to an external property registry.
pub struct PersistentPropertyStore {
    index: EntryIndex,
    stats: CacheStats,
    registry: Arc<dyn PropertyRegistry>,
    /// `prefix + name + "_"`
    namespace: String,
    max: usize,
    ttl: u64,
    save_value_in_memory: bool,
}

impl std::fmt::Debug for PersistentPropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentPropertyStore")
            .field("namespace", &self.namespace)
            .field("entries", &self.index.len())
            .field("max", &self.max)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl PersistentPropertyStore {
    // == Constructor ==
    /// Opens the store for `config.name` and immediately reloads it from `registry`.
    ///
    /// Fails with `InvalidConfiguration` when the name is missing or blank.
    pub fn new(config: &CacheConfig, registry: Arc<dyn PropertyRegistry>) -> Result<Self> {
        let namespace = config.namespace()?;

        let mut store = Self {
            index: EntryIndex::new(),
            stats: CacheStats::new(),
            registry,
            namespace,
            max: config.max,
            ttl: config.ttl,
            save_value_in_memory: config.save_value_in_memory,
        };
        store.reload()?;

        Ok(store)
    }

    /// The registry key prefix owned by this store.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registry key under which `key` is persisted.
    pub fn registry_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, normalize_key(key))
    }

    fn namespaced_properties(&self) -> Result<Vec<String>> {
        Ok(self
            .registry
            .list_properties()?
            .into_iter()
            .filter(|name| name.starts_with(&self.namespace))
            .collect())
    }

    // == Reload ==
    /// Replaces the index with the live, well-formed records of this namespace.
    ///
    /// Corrupt and stale records are removed from the registry along the way.
    /// Surviving entries are indexed oldest `now` first.
    fn reload(&mut self) -> Result<usize> {
        let now = current_timestamp_ms();
        let mut entries = Vec::new();
        let mut corrupt = 0usize;
        let mut expired = 0usize;

        for name in self.namespaced_properties()? {
            let record = match self.registry.get_object(&name)? {
                Some(record) => record,
                None => continue,
            };

            if !record.is_object() {
                warn!("Removing corrupt cache record {name}: not an object ({record})");
                self.registry.remove_property(&name)?;
                corrupt += 1;
                continue;
            }

            match serde_json::from_value::<Entry>(record) {
                Ok(entry) if entry.is_stale_at(self.ttl, now) => {
                    debug!("Removing stale cache record {name}");
                    self.registry.remove_property(&name)?;
                    expired += 1;
                }
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    warn!("Removing corrupt cache record {name}: {e}");
                    self.registry.remove_property(&name)?;
                    corrupt += 1;
                }
            }
        }

        entries.sort_by_key(|entry| entry.now);
        self.index = EntryIndex::from_entries(entries);

        info!(
            "Refreshed {}: loaded={}, expired={}, corrupt={}",
            self.namespace,
            self.index.len(),
            expired,
            corrupt
        );

        Ok(self.index.len())
    }

    /// Removes `key` from the registry, then from the index.
    fn remove_entry(&mut self, key: &str) -> Result<()> {
        self.registry.remove_property(&self.registry_key(key))?;
        self.index.remove(key);
        Ok(())
    }

    /// Looks up `key`, reaping it from both sides if stale.
    fn live_entry(&mut self, key: &str) -> Result<Option<&Entry>> {
        let stale = match self.index.get(key) {
            Some(entry) => entry.is_stale(self.ttl),
            None => {
                debug!("cache miss ({key})");
                self.stats.record_miss();
                return Ok(None);
            }
        };

        if stale {
            debug!("cache miss ({key}): entry expired");
            self.remove_entry(key)?;
            self.stats.record_expiration();
            return Ok(None);
        }

        debug!("cache hit ({key})");
        self.stats.record_hit();
        Ok(self.index.get(key))
    }

    fn evict_if_over_max(&mut self) -> Result<()> {
        if self.max == 0 || self.index.len() <= self.max {
            return Ok(());
        }

        if let Some(oldest) = self.index.oldest_key().cloned() {
            self.remove_entry(&oldest)?;
            self.stats.record_eviction();
            debug!("evicted oldest entry ({oldest})");
        }
        Ok(())
    }
}

#[async_trait]
impl Store for PersistentPropertyStore {
    fn name(&self) -> &'static str {
        "persistent-property"
    }

    async fn get(&mut self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.live_entry(key)?.and_then(|entry| entry.value.clone()))
    }

    async fn entry(&mut self, key: &str) -> Result<Option<Entry>> {
        validate_key(key)?;
        Ok(self.live_entry(key)?.cloned())
    }

    // == Set ==
    /// Stores the entry and returns its content hash.
    ///
    /// The registry write is skipped when the key already holds a value with
    /// the same hash.
    async fn set(&mut self, key: &str, value: Value, ttl: Option<u64>) -> Result<SetOutcome> {
        validate_key(key)?;

        let ttl = resolve_ttl(ttl, self.ttl);
        let hash = content_hash(&value)?;
        let value = self.save_value_in_memory.then_some(value);
        let entry = Entry::new(key, value, ttl).with_hash(hash.clone());

        let unchanged = self
            .index
            .get(key)
            .is_some_and(|prior| prior.hash.as_deref() == Some(hash.as_str()));

        if unchanged {
            debug!("skipping registry write for {key}: content unchanged");
            self.stats.record_skipped_write();
        } else {
            let record = serde_json::to_value(&entry)?;
            self.registry.set_object(&self.registry_key(key), &record)?;
            self.stats.record_external_write();
        }

        self.index.insert(entry);
        self.evict_if_over_max()?;

        Ok(SetOutcome::Persisted { hash })
    }

    async fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.remove_entry(key)
    }

    async fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        Ok(self.index.contains(key))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.index.keys())
    }

    // == Clear ==
    /// Deletes every indexed key, then sweeps orphaned records left in the namespace.
    async fn clear(&mut self) -> Result<()> {
        for key in self.index.keys() {
            self.remove_entry(&key)?;
        }

        let mut orphans = 0usize;
        for name in self.namespaced_properties()? {
            let Some(record) = self.registry.get_object(&name)? else {
                continue;
            };

            if let Some(key) = record.get("key").and_then(Value::as_str) {
                self.registry.remove_property(&name)?;
                self.index.remove(key);
                orphans += 1;
            }
        }

        info!("Cleared {} ({} orphaned records removed)", self.namespace, orphans);
        Ok(())
    }

    fn size(&self) -> usize {
        self.index.len()
    }

    async fn refresh(&mut self) -> Result<()> {
        self.reload().map(|_| ())
    }

    fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }
}
