//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    CleanupResponse, DeleteResponse, EntriesResponse, GetResponse, HasResponse, HealthResponse,
    KeysResponse, MessageResponse, ResizeRequest, ResizeResponse, SetRequest, SetResponse,
    StatsResponse,
};

/// Application state shared across all handlers.
///
/// The cache is single-owner by design; the RwLock is the one exclusive
/// lock guarding it. Reads that bump recency take the write half.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<RwLock<CacheStore>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CacheStore::new(config.cache.clone()))
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a hit bumps recency and refreshes the TTL
    let mut cache = state.cache.write().await;
    let value = cache.get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for GET /has/:key
///
/// Reports whether the key is stored, without touching it.
pub async fn has_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<HasResponse> {
    let cache = state.cache.read().await;
    let exists = cache.has(&key);

    Json(HasResponse { key, exists })
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key, value)))
}

/// Handler for GET /keys
///
/// Lists fresh keys, most recently used first.
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let cache = state.cache.read().await;

    Json(KeysResponse { keys: cache.keys() })
}

/// Handler for GET /entries
///
/// Lists fresh key-value pairs, most recently used first.
pub async fn entries_handler(State(state): State<AppState>) -> Json<EntriesResponse> {
    let cache = state.cache.read().await;

    Json(EntriesResponse::new(cache.entries()))
}

/// Handler for POST /cleanup
///
/// Sweeps expired entries immediately.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let mut cache = state.cache.write().await;
    let removed = cache.cleanup_expired();

    Json(CleanupResponse { removed })
}

/// Handler for PUT /resize
///
/// Changes the cache capacity, evicting least recently used entries to fit.
pub async fn resize_handler(
    State(state): State<AppState>,
    Json(req): Json<ResizeRequest>,
) -> Result<Json<ResizeResponse>> {
    let mut cache = state.cache.write().await;
    let evicted = cache.resize(req.capacity)?;

    Ok(Json(ResizeResponse {
        capacity: req.capacity,
        evicted,
    }))
}

/// Handler for POST /clear
///
/// Drops every entry.
pub async fn clear_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    let mut cache = state.cache.write().await;
    cache.clear();

    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for GET /stats
///
/// Returns current cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    let stats = cache.stats();

    Json(StatsResponse::new(&stats, cache.capacity(), cache.ttl()))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
