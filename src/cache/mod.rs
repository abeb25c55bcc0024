//! Cache Module
//!
//! Provides a byte-bounded in-memory cache with LRU eviction.

mod list;
mod stats;
mod store;
mod value;


// Re-export public types
pub use list::{Handle, Iter, RecencyList};
pub use stats::CacheStats;
pub use store::{EvictionCallback, LruCache};
pub use value::CacheValue;

// == Public Constants ==
/// Maximum allowed key length in bytes accepted by the HTTP layer
pub const MAX_KEY_LENGTH: usize = 256;
