//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::Mutex;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::{CacheValue, LruCache};
use crate::error::{CacheError, Result};
use crate::models::{
    EvictResponse, GetResponse, HealthResponse, HelloResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// Every cache call mutates recency order, so one coarse mutex guards the
/// whole cache for the duration of each call.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache
    pub cache: Arc<Mutex<LruCache<String>>>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: LruCache<String>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Evicted entries are reported to the log.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let cache = LruCache::with_eviction_callback(config.max_bytes, log_eviction);
        Self::new(cache)
    }
}

fn log_eviction(key: String, value: String) {
    info!(key = %key, bytes = key.len() + value.size(), "entry evicted");
}

/// Handler for GET /
pub async fn index_handler() -> Json<HelloResponse> {
    Json(HelloResponse::new())
}

/// Handler for PUT /set
///
/// Stores a key-value pair, evicting older entries if the byte budget requires it.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.lock().await;
    cache.add(req.key.clone(), req.value);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.lock().await;
    let value = cache
        .get(&key)
        .cloned()
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for POST /evict
///
/// Removes the least recently used entry, if any.
pub async fn evict_handler(State(state): State<AppState>) -> Json<EvictResponse> {
    let mut cache = state.cache.lock().await;
    let evicted = cache.remove_oldest();

    Json(EvictResponse::new(evicted, cache.len()))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.lock().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.max_bytes()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
