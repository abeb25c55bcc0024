//! Byte LRU - a byte-bounded least-recently-used cache
//!
//! The [`cache`] module holds the engine; [`api`] exposes one shared
//! instance over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;

pub use api::AppState;
pub use cache::{CacheValue, LruCache};
pub use config::Config;
