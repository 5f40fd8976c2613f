//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use lenta_core::ports::{
    Cache, CommentRepository, FollowRepository, GroupRepository, MediaStore, PostRepository,
    UserRepository,
};
use lenta_infra::{
    InMemoryCache, InMemoryCommentRepository, InMemoryFollowRepository, InMemoryGroupRepository,
    InMemoryMediaStore, InMemoryPostRepository, InMemoryUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub cache: Arc<dyn Cache>,
    pub media: Arc<dyn MediaStore>,
    pub cache_ttl: Duration,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        if let Some(db_config) = &config.database {
            match lenta_infra::connect(db_config).await {
                Ok(db) => {
                    use lenta_infra::{
                        PostgresCommentRepository, PostgresFollowRepository,
                        PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
                    };

                    tracing::info!("Application state initialized (postgres)");
                    return Self {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        groups: Arc::new(PostgresGroupRepository::new(db.clone())),
                        posts: Arc::new(PostgresPostRepository::new(db.clone())),
                        comments: Arc::new(PostgresCommentRepository::new(db.clone())),
                        follows: Arc::new(PostgresFollowRepository::new(db)),
                        cache: Arc::new(InMemoryCache::new()),
                        media: Arc::new(InMemoryMediaStore::new()),
                        cache_ttl: config.cache_ttl,
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory repositories");

        Self::in_memory(config.cache_ttl)
    }

    /// In-memory state: the no-database fallback and the test fixture.
    pub fn in_memory(cache_ttl: Duration) -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            groups: Arc::new(InMemoryGroupRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
            follows: Arc::new(InMemoryFollowRepository::new()),
            cache: Arc::new(InMemoryCache::new()),
            media: Arc::new(InMemoryMediaStore::new()),
            cache_ttl,
        }
    }
}
