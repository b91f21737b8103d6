use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;

use crate::api::Cluster;
use crate::cache::CacheKey;

/// Errors reported by a cache store.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The key is valid but nothing has been stored under it yet.
    #[error("cache miss")]
    Miss,

    /// The value does not fit the key it is stored under.
    #[error("cache entry '{key}' holds the wrong kind of value")]
    TypeMismatch { key: CacheKey },

    /// The backing storage failed.
    #[error("cache storage error: {0}")]
    Storage(String),
}

/// A value held in the cache.
///
/// Serializes to the bare payload: a cluster object or a list of
/// `NAME=value` strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CachedValue {
    Cluster(Box<Cluster>),
    Env(Vec<String>),
}

impl CachedValue {
    /// Whether this value may be stored under `key`.
    pub fn fits(&self, key: CacheKey) -> bool {
        match self {
            CachedValue::Cluster(_) => !key.is_env(),
            CachedValue::Env(_) => key.is_env(),
        }
    }
}

/// Read and write access to cached snapshots.
///
/// Implementations must be safe to share across request tasks.
pub trait CacheStore: Send + Sync {
    fn load(&self, key: CacheKey) -> Result<CachedValue, CacheError>;

    fn store(&self, key: CacheKey, value: CachedValue) -> Result<(), CacheError>;
}

/// Cache held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<CacheKey, CachedValue>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for InMemoryCache {
    fn load(&self, key: CacheKey) -> Result<CachedValue, CacheError> {
        self.entries.read().get(&key).cloned().ok_or(CacheError::Miss)
    }

    fn store(&self, key: CacheKey, value: CachedValue) -> Result<(), CacheError> {
        if !value.fits(key) {
            return Err(CacheError::TypeMismatch { key });
        }
        self.entries.write().insert(key, value);
        Ok(())
    }
}
