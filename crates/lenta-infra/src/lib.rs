//! # Lenta Infrastructure
//!
//! Concrete implementations of the ports defined in `lenta-core`.
//! This crate contains database repositories, the rendered-page cache,
//! authentication services, and the media store.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory implementations only
//! - `postgres` - PostgreSQL repositories via SeaORM

pub mod auth;
pub mod cache;
pub mod database;
pub mod media;
pub mod repository;

pub use auth::{Argon2PasswordService, JwtTokenService};
pub use cache::InMemoryCache;
pub use database::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use database::connect;
pub use media::InMemoryMediaStore;
pub use repository::{
    InMemoryCommentRepository, InMemoryFollowRepository, InMemoryGroupRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use database::{
    PostgresCommentRepository, PostgresFollowRepository, PostgresGroupRepository,
    PostgresPostRepository, PostgresUserRepository,
};
