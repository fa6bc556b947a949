//! In-process property registry.

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::error::{CacheError, Result};
use crate::registry::PropertyRegistry;

/// Registry held entirely in memory, listed in name order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    properties: RwLock<BTreeMap<String, Value>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored properties, across all namespaces.
    pub fn len(&self) -> usize {
        self.properties.read().map(|p| p.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::Registry("registry lock poisoned".to_string())
}

impl PropertyRegistry for MemoryRegistry {
    fn list_properties(&self) -> Result<Vec<String>> {
        Ok(self.properties.read().map_err(poisoned)?.keys().cloned().collect())
    }

    fn get_object(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.properties.read().map_err(poisoned)?.get(name).cloned())
    }

    fn set_object(&self, name: &str, object: &Value) -> Result<()> {
        self.properties
            .write()
            .map_err(poisoned)?
            .insert(name.to_string(), object.clone());
        Ok(())
    }

    fn remove_property(&self, name: &str) -> Result<()> {
        self.properties.write().map_err(poisoned)?.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_remove() {
        let registry = MemoryRegistry::new();

        registry.set_object("b", &json!({"key": "b"})).unwrap();
        registry.set_object("a", &json!(1)).unwrap();

        assert_eq!(registry.list_properties().unwrap(), vec!["a", "b"]);
        assert_eq!(registry.get_object("a").unwrap(), Some(json!(1)));

        registry.remove_property("a").unwrap();
        registry.remove_property("missing").unwrap();

        assert_eq!(registry.get_object("a").unwrap(), None);
        assert_eq!(registry.len(), 1);
    }
}
