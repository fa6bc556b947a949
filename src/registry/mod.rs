//! Property Registry Module
//!
//! The external, namespaced key/value medium a persistent store mirrors its
//! entries into. Only four operations are required of it.

mod file;
mod memory;

pub use file::FileRegistry;
pub use memory::MemoryRegistry;

use serde_json::Value;

use crate::error::Result;

// == Property Registry ==
/// A shared registry of named JSON objects.
///
/// Implementations use interior mutability; a registry may be shared by
/// several cache instances, each confined to its own name prefix.
///
/// Every method is synchronous. Stores call the registry from their async
/// methods while the cache lock is held, so an implementation backed by slow
/// I/O blocks a runtime worker for the duration of each call.
pub trait PropertyRegistry: Send + Sync {
    /// Names of every stored property.
    fn list_properties(&self) -> Result<Vec<String>>;

    /// Reads a property, `None` if it does not exist.
    fn get_object(&self, name: &str) -> Result<Option<Value>>;

    /// Creates or replaces a property.
    fn set_object(&self, name: &str, object: &Value) -> Result<()>;

    /// Removes a property; removing a missing property is not an error.
    fn remove_property(&self, name: &str) -> Result<()>;
}
