//! JSON file backed property registry.
//!
//! The whole registry is one JSON object on disk, loaded on open and
//! rewritten after every mutation. Rewrites go to a temporary file in the
//! same directory which is then renamed over the target, so the file on disk
//! is always either the previous or the next complete document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::registry::PropertyRegistry;

/// Registry persisted to a single JSON file.
///
/// All I/O is synchronous `std::fs`. Each `set_object`/`remove_property`
/// blocks the calling thread until the file has been synced and replaced.
#[derive(Debug)]
pub struct FileRegistry {
    path: PathBuf,
    properties: RwLock<Map<String, Value>>,
}

impl FileRegistry {
    /// Opens the registry at `path`; a missing file is an empty registry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let properties = match fs::read(&path) {
            Ok(bytes) if bytes.is_empty() => Map::new(),
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes)? {
                Value::Object(map) => map,
                _ => {
                    return Err(CacheError::Registry(format!(
                        "{} does not contain a JSON object",
                        path.display()
                    )))
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Map::new(),
            Err(e) => {
                return Err(CacheError::Registry(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };

        debug!(
            "Opened registry {} with {} properties",
            path.display(),
            properties.len()
        );

        Ok(Self {
            path,
            properties: RwLock::new(properties),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Persist ==
    /// Writes `properties` to a sibling temp file, syncs it and renames it
    /// over the registry file.
    fn persist(&self, properties: &Map<String, Value>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(properties)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let failed = |e: std::io::Error| {
            CacheError::Registry(format!("failed to write {}: {e}", self.path.display()))
        };

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(failed)?;
        temp.write_all(&bytes).map_err(failed)?;
        temp.as_file().sync_all().map_err(failed)?;
        // On failure the temp file is dropped and deleted
        temp.persist(&self.path).map_err(|e| failed(e.error))?;
        Ok(())
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::Registry("registry lock poisoned".to_string())
}

impl PropertyRegistry for FileRegistry {
    fn list_properties(&self) -> Result<Vec<String>> {
        Ok(self.properties.read().map_err(poisoned)?.keys().cloned().collect())
    }

    fn get_object(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.properties.read().map_err(poisoned)?.get(name).cloned())
    }

    fn set_object(&self, name: &str, object: &Value) -> Result<()> {
        let mut properties = self.properties.write().map_err(poisoned)?;
        let previous = properties.insert(name.to_string(), object.clone());

        if let Err(e) = self.persist(&properties) {
            // Keep memory consistent with what is on disk
            match previous {
                Some(previous) => properties.insert(name.to_string(), previous),
                None => properties.remove(name),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_property(&self, name: &str) -> Result<()> {
        let mut properties = self.properties.write().map_err(poisoned)?;
        if let Some(previous) = properties.remove(name) {
            if let Err(e) = self.persist(&properties) {
                properties.insert(name.to_string(), previous);
                return Err(e);
            }
        }
        Ok(())
    }
}
