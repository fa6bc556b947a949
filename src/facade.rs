//! Cache Façade
//!
//! Selects a store at construction time, serializes access to it and applies
//! the ignore-errors policy.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::error;

use crate::cache::{CacheStats, Entry};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::registry::PropertyRegistry;
use crate::store::{validate_key, MemoryStore, PersistentPropertyStore, SetOutcome, Store};

// == Store Kind ==
/// Which store a [`Cache`] is built on.
pub enum StoreKind {
    /// Volatile in-process store
    Memory,
    /// Store mirrored into the given property registry
    PersistentProperty(Arc<dyn PropertyRegistry>),
    /// Any caller-supplied store
    Custom(Box<dyn Store>),
}

impl std::fmt::Debug for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreKind::Memory => f.write_str("Memory"),
            StoreKind::PersistentProperty(_) => f.write_str("PersistentProperty"),
            StoreKind::Custom(store) => write!(f, "Custom({})", store.name()),
        }
    }
}

// == Cache ==
/// Shareable cache over a single store.
///
/// All operations lock the whole store, so a `Cache` can be put in an `Arc`
/// and used from many tasks.
pub struct Cache {
    store: Mutex<Box<dyn Store>>,
    ttl: u64,
    max: usize,
    name: Option<String>,
    ignore_errors: bool,
}

impl Cache {
    // == Constructor ==
    /// Builds the selected store from `config`.
    ///
    /// Persistent stores are refreshed from their registry before this returns.
    pub fn new(config: CacheConfig, kind: StoreKind) -> Result<Self> {
        let store: Box<dyn Store> = match kind {
            StoreKind::Memory => Box::new(MemoryStore::from_config(&config)),
            StoreKind::PersistentProperty(registry) => {
                Box::new(PersistentPropertyStore::new(&config, registry)?)
            }
            StoreKind::Custom(store) => store,
        };

        Ok(Self {
            store: Mutex::new(store),
            ttl: config.ttl,
            max: config.max,
            name: config.name,
            ignore_errors: config.ignore_errors,
        })
    }

    /// In-memory cache with default TTL `ttl` and maximum size `max`.
    pub fn memory(ttl: u64, max: usize) -> Self {
        Self {
            store: Mutex::new(Box::new(MemoryStore::new(ttl, max))),
            ttl,
            max,
            name: None,
            ignore_errors: false,
        }
    }

    // == Accessors ==
    /// Default TTL in seconds, 0 = no expiry.
    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    /// Maximum number of entries, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        (self.max > 0).then_some(self.max)
    }

    /// Namespace of a persistent store, `None` for unnamed stores.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Applies the ignore-errors policy: log and fall back, or propagate.
    fn settle<T: Display + ?Sized, R>(&self, op: &T, result: Result<R>, fallback: R) -> Result<R> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                error!("cache.{op} failed: {e}");
                if self.ignore_errors {
                    Ok(fallback)
                } else {
                    Err(e)
                }
            }
        }
    }

    // == Get ==
    /// Returns the live value for `key`, if any.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let result = match validate_key(key) {
            Ok(()) => self.store.lock().await.get(key).await,
            Err(e) => Err(e),
        };
        self.settle("get", result, None)
    }

    /// Returns the live value for `key` deserialized as `T`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let result: Result<Option<T>> = match self.get(key).await? {
            Some(value) => serde_json::from_value(value).map(Some).map_err(Into::into),
            None => Ok(None),
        };
        self.settle("get", result, None)
    }

    /// Returns the live entry record for `key`, if any.
    pub async fn entry(&self, key: &str) -> Result<Option<Entry>> {
        let result = match validate_key(key) {
            Ok(()) => self.store.lock().await.entry(key).await,
            Err(e) => Err(e),
        };
        self.settle("entry", result, None)
    }

    // == Set ==
    /// Stores `value` under `key`; `None` is returned when a failure was ignored.
    pub async fn set(&self, key: &str, value: Value, ttl: Option<u64>) -> Result<Option<SetOutcome>> {
        let result = match validate_key(key) {
            Ok(()) => self.store.lock().await.set(key, value, ttl).await.map(Some),
            Err(e) => Err(e),
        };
        self.settle("set", result, None)
    }

    /// Serializes `value` and stores it under `key`.
    pub async fn set_as<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<u64>,
    ) -> Result<Option<SetOutcome>> {
        match serde_json::to_value(value) {
            Ok(value) => self.set(key, value, ttl).await,
            Err(e) => self.settle("set", Err(e.into()), None),
        }
    }

    // == Delete ==
    /// Removes `key`; returns false only when a failure was ignored.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = match validate_key(key) {
            Ok(()) => self.store.lock().await.delete(key).await.map(|_| true),
            Err(e) => Err(e),
        };
        self.settle("delete", result, false)
    }

    // == Has ==
    /// Reports whether `key` is indexed, without checking staleness.
    pub async fn has(&self, key: &str) -> Result<bool> {
        let result = match validate_key(key) {
            Ok(()) => self.store.lock().await.has(key).await,
            Err(e) => Err(e),
        };
        self.settle("has", result, false)
    }

    // == Keys ==
    /// Returns indexed keys, oldest insertion first.
    pub async fn keys(&self) -> Result<Vec<String>> {
        let result = self.store.lock().await.keys().await;
        self.settle("keys", result, Vec::new())
    }

    // == Clear ==
    /// Removes every entry; returns false only when a failure was ignored.
    pub async fn clear(&self) -> Result<bool> {
        let result = self.store.lock().await.clear().await.map(|_| true);
        self.settle("clear", result, false)
    }

    // == Refresh ==
    /// Reloads the store from durable storage; returns false only when a failure was ignored.
    pub async fn refresh(&self) -> Result<bool> {
        let result = self.store.lock().await.refresh().await.map(|_| true);
        self.settle("refresh", result, false)
    }

    // == Size ==
    /// Number of indexed entries.
    pub async fn size(&self) -> usize {
        self.store.lock().await.size()
    }

    // == Stats ==
    /// Snapshot of the store's counters.
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("ttl", &self.ttl)
            .field("max", &self.max)
            .field("name", &self.name)
            .field("ignore_errors", &self.ignore_errors)
            .finish()
    }
}
