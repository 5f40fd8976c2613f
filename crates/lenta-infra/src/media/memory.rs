//! In-memory media store.
//!
//! Maps an uploaded file name to a `posts/<name>` storage path and remembers
//! what it has stored. A production deployment would put an object store or
//! filesystem behind the same port; the rest of the platform only ever sees
//! the returned path.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lenta_core::ports::{MediaError, MediaStore};

const MEDIA_PREFIX: &str = "posts";

/// In-memory media store.
#[derive(Default)]
pub struct InMemoryMediaStore {
    stored: RwLock<HashSet<String>>,
}

impl InMemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a path was produced by this store; test helper.
    pub async fn contains(&self, path: &str) -> bool {
        self.stored.read().await.contains(path)
    }
}

#[async_trait]
impl MediaStore for InMemoryMediaStore {
    async fn store(&self, filename: &str) -> Result<String, MediaError> {
        let name = filename.trim();
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(MediaError::InvalidName(filename.to_string()));
        }

        let path = format!("{MEDIA_PREFIX}/{name}");
        self.stored.write().await.insert(path.clone());
        tracing::debug!(path = %path, "Stored uploaded file");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_under_posts_prefix() {
        let store = InMemoryMediaStore::new();
        let path = store.store("small.gif").await.unwrap();
        assert_eq!(path, "posts/small.gif");
        assert!(store.contains("posts/small.gif").await);
    }

    #[tokio::test]
    async fn rejects_path_traversal_names() {
        let store = InMemoryMediaStore::new();
        assert!(store.store("../etc/passwd").await.is_err());
        assert!(store.store("a/b.gif").await.is_err());
        assert!(store.store("").await.is_err());
    }
}
