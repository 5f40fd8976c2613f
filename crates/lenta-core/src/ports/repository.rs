use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, NewComment, NewPost, Post, User};
use crate::error::RepoError;

/// Generic repository trait for entities with caller-supplied ids.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique handle.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    /// Find a group by its URL slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title; feeds the post form's group select.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository.
///
/// Post ids are store-assigned monotonic sequences, so creation and editing
/// are explicit operations rather than a generic upsert. Every listing query
/// orders by `pub_date` descending (newest first), id descending breaking
/// ties between equal timestamps.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Insert a new post; the store assigns id and pub_date.
    async fn create(&self, new: NewPost) -> Result<Post, RepoError>;

    /// Update the mutable fields of one post: text, group, image.
    /// Author and pub_date are never touched.
    async fn update_content(
        &self,
        id: i64,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, RepoError>;

    async fn delete(&self, id: i64) -> Result<(), RepoError>;

    /// All posts, newest first.
    async fn find_recent(&self) -> Result<Vec<Post>, RepoError>;

    /// Posts in one group, newest first.
    async fn find_by_group(&self, group_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts by one author, newest first.
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Posts by any of the given authors, newest first. Empty input yields
    /// an empty result, not an error.
    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create(&self, new: NewComment) -> Result<Comment, RepoError>;

    /// Comments on one post, oldest first.
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

/// Follow graph repository.
///
/// Edge creation must be atomic with its uniqueness check: implementations
/// rely on a store-level constraint on `(user_id, author_id)`, never on
/// check-then-insert in application code.
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create the edge. Returns `Ok(true)` if a new edge was inserted and
    /// `Ok(false)` if it already existed; the duplicate case is a success.
    async fn follow(&self, follow: Follow) -> Result<bool, RepoError>;

    /// Delete the edge if present; a missing edge is a no-op.
    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RepoError>;

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    /// Ids of every author the user follows.
    async fn following_of(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError>;

    /// Total number of edges in the graph.
    async fn count(&self) -> Result<u64, RepoError>;
}
