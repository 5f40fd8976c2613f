use async_trait::async_trait;
use std::time::Duration;

/// Cache trait - abstraction over the rendered-page cache.
///
/// The cache is a performance optimization, never a correctness dependency:
/// callers treat `get` returning `None` (including on backend failure) as a
/// miss and recompute. Writes to the entity store do not invalidate entries;
/// staleness is bounded by the TTL or an explicit [`Cache::clear`].
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from the cache.
    async fn get(&self, key: &str) -> Option<String>;

    /// Set a value in the cache with optional TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Delete a key from the cache.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Drop every entry. The next request recomputes from current store
    /// state; used by operators and test harnesses.
    async fn clear(&self) -> Result<(), CacheError>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> bool;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
