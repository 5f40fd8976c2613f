//! Media storage port.
//!
//! Upload handling is an external collaborator: the platform hands a file
//! name to the blob store and records the opaque storage path it returns on
//! the post. Nothing in the core reads the blob back.

use async_trait::async_trait;

/// Blob store for post images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an uploaded file and return its storage path
    /// (e.g. `posts/small.gif`).
    async fn store(&self, filename: &str) -> Result<String, MediaError>;
}

/// Media store errors.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage failed: {0}")]
    Storage(String),
}
