//! In-memory repository implementations.
//!
//! These back the no-database fallback mode and the handler-level tests.

mod memory;

pub use memory::{
    InMemoryCommentRepository, InMemoryFollowRepository, InMemoryGroupRepository,
    InMemoryPostRepository, InMemoryUserRepository,
};
