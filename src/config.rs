//! Configuration Module
//!
//! Construction-time options shared by every store type, loadable from
//! environment variables.

use std::env;

use crate::cache::DEFAULT_PREFIX;
use crate::error::{CacheError, Result};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL in seconds, 0 = no expiry
    pub ttl: u64,
    /// Maximum number of entries, 0 = unbounded
    pub max: usize,
    /// Namespace of a persistent store; ignored by the memory store
    pub name: Option<String>,
    /// Keep values in memory (and in persisted records); metadata only otherwise
    pub save_value_in_memory: bool,
    /// Registry key prefix of a persistent store
    pub prefix: String,
    /// Log and swallow store errors in the façade instead of returning them
    pub ignore_errors: bool,
}

impl CacheConfig {
    /// Creates a configuration with the given default TTL and maximum size.
    pub fn new(ttl: u64, max: usize) -> Self {
        Self {
            ttl,
            max,
            ..Self::default()
        }
    }

    // == Builders ==
    /// Sets the namespace used by persistent stores.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the prefix put in front of every registry key.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets whether stores keep entry values, or only their metadata.
    pub fn with_save_value_in_memory(mut self, save: bool) -> Self {
        self.save_value_in_memory = save;
        self
    }

    /// Sets whether the façade logs store errors and returns fallbacks.
    pub fn with_ignore_errors(mut self, ignore: bool) -> Self {
        self.ignore_errors = ignore;
        self
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TURBOCACHE_TTL` - Default TTL in seconds (default: 0)
    /// - `TURBOCACHE_MAX` - Maximum entries, 0 = unbounded (default: 0)
    /// - `TURBOCACHE_NAME` - Persistent store namespace (default: unset)
    /// - `TURBOCACHE_SAVE_VALUE_IN_MEMORY` - Retain values (default: true)
    /// - `TURBOCACHE_PREFIX` - Registry key prefix (default: `turbocache__`)
    /// - `TURBOCACHE_IGNORE_ERRORS` - Swallow store errors (default: false)
    ///
    /// Unlike unset variables, present but malformed values are rejected.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ttl = match lookup("TURBOCACHE_TTL") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CacheError::InvalidConfiguration(format!("ttl must be a number, got {raw:?}"))
            })?,
            None => defaults.ttl,
        };

        let max = match lookup("TURBOCACHE_MAX") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                CacheError::InvalidConfiguration(format!(
                    "max must be a non-negative number, got {raw:?}"
                ))
            })?,
            None => defaults.max,
        };

        let save_value_in_memory = match lookup("TURBOCACHE_SAVE_VALUE_IN_MEMORY") {
            Some(raw) => parse_bool("TURBOCACHE_SAVE_VALUE_IN_MEMORY", &raw)?,
            None => defaults.save_value_in_memory,
        };

        let ignore_errors = match lookup("TURBOCACHE_IGNORE_ERRORS") {
            Some(raw) => parse_bool("TURBOCACHE_IGNORE_ERRORS", &raw)?,
            None => defaults.ignore_errors,
        };

        Ok(Self {
            ttl,
            max,
            name: lookup("TURBOCACHE_NAME"),
            save_value_in_memory,
            prefix: lookup("TURBOCACHE_PREFIX").unwrap_or(defaults.prefix),
            ignore_errors,
        })
    }

    // == Namespace ==
    /// Returns the registry key prefix owned by this cache instance:
    /// `prefix + trim(name) + "_"`.
    ///
    /// Fails when the name is missing or blank, which persistent stores require.
    pub fn namespace(&self) -> Result<String> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                CacheError::InvalidConfiguration("name must be a non-empty string".to_string())
            })?;

        Ok(format!("{}{}_", self.prefix, name))
    }

    /// Maximum entry count, `None` when unbounded.
    pub fn max_entries(&self) -> Option<usize> {
        (self.max > 0).then_some(self.max)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: 0,
            max: 0,
            name: None,
            save_value_in_memory: true,
            prefix: DEFAULT_PREFIX.to_string(),
            ignore_errors: false,
        }
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CacheError::InvalidConfiguration(format!(
            "{var} must be a boolean, got {raw:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_default() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, 0);
        assert_eq!(config.max, 0);
        assert!(config.name.is_none());
        assert!(config.save_value_in_memory);
        assert_eq!(config.prefix, "turbocache__");
        assert!(!config.ignore_errors);
        assert_eq!(config.max_entries(), None);
    }

    #[test]
    fn test_config_from_lookup_defaults() {
        let config = CacheConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.ttl, 0);
        assert_eq!(config.max, 0);
        assert_eq!(config.prefix, "turbocache__");
    }

    #[test]
    fn test_config_from_lookup_values() {
        let config = CacheConfig::from_lookup(lookup_from(&[
            ("TURBOCACHE_TTL", "60"),
            ("TURBOCACHE_MAX", "10"),
            ("TURBOCACHE_NAME", "images"),
            ("TURBOCACHE_SAVE_VALUE_IN_MEMORY", "false"),
            ("TURBOCACHE_IGNORE_ERRORS", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.ttl, 60);
        assert_eq!(config.max_entries(), Some(10));
        assert_eq!(config.name.as_deref(), Some("images"));
        assert!(!config.save_value_in_memory);
        assert!(config.ignore_errors);
    }

    #[test]
    fn test_config_rejects_non_numeric_ttl() {
        let result = CacheConfig::from_lookup(lookup_from(&[("TURBOCACHE_TTL", "soon")]));
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_config_rejects_negative_max() {
        let result = CacheConfig::from_lookup(lookup_from(&[("TURBOCACHE_MAX", "-1")]));
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_config_rejects_bad_flag() {
        let result =
            CacheConfig::from_lookup(lookup_from(&[("TURBOCACHE_IGNORE_ERRORS", "maybe")]));
        assert!(matches!(result, Err(CacheError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_namespace() {
        let config = CacheConfig::default().with_name("  images ");
        assert_eq!(config.namespace().unwrap(), "turbocache__images_");

        let config = CacheConfig::default().with_name("x").with_prefix("app.");
        assert_eq!(config.namespace().unwrap(), "app.x_");
    }

    #[test]
    fn test_namespace_requires_name() {
        let config = CacheConfig::default();
        assert!(matches!(
            config.namespace(),
            Err(CacheError::InvalidConfiguration(_))
        ));

        let config = CacheConfig::default().with_name("   ");
        assert!(matches!(
            config.namespace(),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }
}
