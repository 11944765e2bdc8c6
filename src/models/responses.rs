//! Response DTOs for the cache host API

use serde::Serialize;

use crate::cache::EvictionPolicy;

/// Body of a successful `GET /get/:key`.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: String,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Acknowledgement for writes that touch a single key (`PUT /set`,
/// `DELETE /del/:key`).
#[derive(Debug, Clone, Serialize)]
pub struct KeyResponse {
    pub message: String,
    pub key: String,
}

impl KeyResponse {
    pub fn stored(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Stored key '{}'", key),
            key,
        }
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted", key),
            key,
        }
    }
}

/// Body of `GET /health`: liveness plus the shape of the cache.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub policy: EvictionPolicy,
    pub shards: usize,
    /// Entries currently held, including expired ones not yet swept
    pub entries: usize,
}

impl HealthResponse {
    pub fn healthy(policy: EvictionPolicy, shards: usize, entries: usize) -> Self {
        Self {
            status: "healthy",
            timestamp: chrono::Utc::now().to_rfc3339(),
            policy,
            shards,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_response_messages() {
        let stored = serde_json::to_value(KeyResponse::stored("my_key")).unwrap();
        assert_eq!(stored["key"], "my_key");
        assert!(stored["message"].as_str().unwrap().contains("my_key"));

        let deleted = serde_json::to_value(KeyResponse::deleted("gone")).unwrap();
        assert_eq!(deleted["key"], "gone");
        assert!(deleted["message"].as_str().unwrap().contains("deleted"));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_value(HealthResponse::healthy(EvictionPolicy::Lfu, 4, 2)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["policy"], "lfu");
        assert_eq!(json["shards"], 4);
        assert_eq!(json["entries"], 2);
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }
}
