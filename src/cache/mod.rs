//! Cache Module
//!
//! Engine data model: entries, insertion-ordered index, statistics and
//! content hashing.

mod digest;
mod entry;
mod index;
mod order;
mod stats;


// Re-export public types
pub use digest::content_hash;
pub use entry::{current_timestamp_ms, Entry};
pub use index::EntryIndex;
pub use order::InsertionOrder;
pub use stats::CacheStats;

// == Public Constants ==
/// Default registry key prefix of persistent stores
pub const DEFAULT_PREFIX: &str = "turbocache__";

/// Seconds in a minute
pub const ONE_MINUTE: u64 = 60;
/// Seconds in an hour
pub const ONE_HOUR: u64 = ONE_MINUTE * 60;
/// Seconds in a day
pub const ONE_DAY: u64 = ONE_HOUR * 24;
/// Seconds in a week
pub const ONE_WEEK: u64 = ONE_DAY * 7;
/// Seconds in a 52-week year
pub const ONE_YEAR: u64 = ONE_WEEK * 52;
