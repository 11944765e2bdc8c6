//! API Handlers
//!
//! HTTP request handlers for each cache host endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Cache, EvictionPolicy, ShardedCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{GetResponse, HealthResponse, KeyResponse, SetRequest};

/// Application state shared across all handlers.
///
/// The sharded cache locks each shard internally, so the state only needs an
/// `Arc` to be shared between requests.
#[derive(Clone)]
pub struct AppState {
    /// Sharded cache of string values
    pub cache: Arc<ShardedCache<String>>,
    /// Eviction policy the shards were built with
    pub policy: EvictionPolicy,
}

impl AppState {
    /// Builds a sharded cache for the given layout and policy.
    pub fn new(shard_count: usize, shard_capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        let cache = ShardedCache::with_policy(shard_count, shard_capacity, policy)?;
        Ok(Self {
            cache: Arc::new(cache),
            policy,
        })
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.shard_count, config.shard_capacity, config.policy)
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<KeyResponse>> {
    req.validate()?;

    let ttl = req.ttl();
    state.cache.set(&req.key, req.value, ttl);

    Ok(Json(KeyResponse::stored(req.key)))
}

/// Handler for GET /get/:key
///
/// Misses and expired entries both answer 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    match state.cache.get(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<KeyResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(KeyResponse::deleted(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.policy,
        state.cache.shard_count(),
        state.cache.len(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState::new(4, 25, EvictionPolicy::Lru).unwrap()
    }

    #[tokio::test]
    async fn test_set_and_get_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "test_key".to_string(),
            value: "test_value".to_string(),
            ttl: None,
        };
        let result = set_handler(State(state.clone()), Json(req)).await;
        assert!(result.is_ok());

        let result = get_handler(State(state.clone()), Path("test_key".to_string())).await;
        let response = result.unwrap();
        assert_eq!(response.value, "test_value");
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let state = test_state();

        let result = get_handler(State(state), Path("nonexistent".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();

        let req = SetRequest {
            key: "to_delete".to_string(),
            value: "value".to_string(),
            ttl: None,
        };
        let stored = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(stored.key, "to_delete");

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(result.is_ok());

        let result = delete_handler(State(state.clone()), Path("to_delete".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));

        let result = get_handler(State(state), Path("to_delete".to_string())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_health_handler() {
        let state = AppState::new(2, 10, EvictionPolicy::Lfu).unwrap();
        state.cache.set("a", "1".to_string(), None);

        let response = health_handler(State(state)).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.policy, EvictionPolicy::Lfu);
        assert_eq!(response.shards, 2);
        assert_eq!(response.entries, 1);
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let state = test_state();

        let req = SetRequest {
            key: "".to_string(),
            value: "value".to_string(),
            ttl: None,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_state_rejects_zero_shards() {
        assert!(matches!(
            AppState::new(0, 10, EvictionPolicy::Lru),
            Err(CacheError::InvalidConfiguration(_))
        ));
    }
}
