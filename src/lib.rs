//! Turbocache - A keyed cache engine
//!
//! TTL expiry, a maximum-entry bound with oldest-insertion eviction, and
//! pluggable stores: in-memory, or mirrored into a persistent property registry.

pub mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod registry;
pub mod store;

pub use cache::{Entry, ONE_DAY, ONE_HOUR, ONE_MINUTE, ONE_WEEK, ONE_YEAR};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use facade::{Cache, StoreKind};
pub use registry::{FileRegistry, MemoryRegistry, PropertyRegistry};
pub use store::{MemoryStore, PersistentPropertyStore, SetOutcome, Store};

/// Parses a TTL given as text, in seconds.
pub fn parse_ttl(raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| CacheError::InvalidTtl(format!("ttl must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl(" 60 ").unwrap(), 60);
        assert!(matches!(parse_ttl("soon"), Err(CacheError::InvalidTtl(_))));
        assert!(matches!(parse_ttl("-5"), Err(CacheError::InvalidTtl(_))));
    }

    #[test]
    fn test_time_periods() {
        assert_eq!(ONE_HOUR, 3_600);
        assert_eq!(ONE_DAY, 86_400);
        assert_eq!(ONE_WEEK, 604_800);
        assert_eq!(ONE_YEAR, 31_449_600);
    }
}
