//! HashMap-backed repositories behind async RwLocks.
//!
//! The follow repository keeps edges in a map keyed by `(user, author)` and
//! inserts under the write lock, so the uniqueness check is atomic with the
//! insert - the same discipline the unique index gives the SQL store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use lenta_core::domain::{Comment, Follow, Group, NewComment, NewPost, Post, User};
use lenta_core::error::RepoError;
use lenta_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
}

/// In-memory user repository.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint("username already taken".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.users.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

/// In-memory group repository.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    groups: RwLock<HashMap<Uuid, Group>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut groups = self.groups.write().await;
        if groups
            .values()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint("slug already taken".to_string()));
        }
        groups.insert(group.id, group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.groups.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        Ok(self
            .groups
            .read()
            .await
            .values()
            .find(|g| g.slug == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let mut groups: Vec<Group> = self.groups.read().await.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

/// In-memory post repository with a monotonic id sequence.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<i64, Post>>,
    next_id: AtomicI64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let post = Post {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            author_id: new.author_id,
            text: new.text,
            pub_date: Utc::now(),
            group_id: new.group_id,
            image: new.image,
        };
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_content(
        &self,
        id: i64,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.text = text;
        post.group_id = group_id;
        post.image = image;
        Ok(post.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        match self.posts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }

    async fn find_recent(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_by_group(&self, group_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.group_id == Some(group_id))
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| author_ids.contains(&p.author_id))
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }
}

/// In-memory comment repository.
#[derive(Default)]
pub struct InMemoryCommentRepository {
    comments: RwLock<HashMap<i64, Comment>>,
    next_id: AtomicI64,
}

impl InMemoryCommentRepository {
    pub fn new() -> Self {
        Self {
            comments: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let comment = Comment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            post_id: new.post_id,
            author_id: new.author_id,
            text: new.text,
            created: Utc::now(),
        };
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .comments
            .read()
            .await
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }
}

/// In-memory follow repository.
#[derive(Default)]
pub struct InMemoryFollowRepository {
    edges: RwLock<HashMap<(Uuid, Uuid), Follow>>,
}

impl InMemoryFollowRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn follow(&self, follow: Follow) -> Result<bool, RepoError> {
        let mut edges = self.edges.write().await;
        let key = (follow.user_id, follow.author_id);
        if edges.contains_key(&key) {
            return Ok(false);
        }
        edges.insert(key, follow);
        Ok(true)
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RepoError> {
        self.edges.write().await.remove(&(user_id, author_id));
        Ok(())
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.edges.read().await.contains_key(&(user_id, author_id)))
    }

    async fn following_of(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        Ok(self
            .edges
            .read()
            .await
            .keys()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, a)| *a)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.edges.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn follow_twice_creates_one_edge() {
        let repo = InMemoryFollowRepository::new();
        let user = Uuid::new_v4();
        let author = Uuid::new_v4();

        assert!(repo.follow(Follow::new(user, author)).await.unwrap());
        assert!(!repo.follow(Follow::new(user, author)).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unfollow_missing_edge_is_noop() {
        let repo = InMemoryFollowRepository::new();
        repo.unfollow(Uuid::new_v4(), Uuid::new_v4()).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn posts_come_back_newest_first() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        for i in 0..3 {
            repo.create(NewPost {
                author_id: author,
                text: format!("post {i}"),
                group_id: None,
                image: None,
            })
            .await
            .unwrap();
        }

        let posts = repo.find_recent().await.unwrap();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn update_content_keeps_author_and_pub_date() {
        let repo = InMemoryPostRepository::new();
        let author = Uuid::new_v4();
        let post = repo
            .create(NewPost {
                author_id: author,
                text: "before".to_string(),
                group_id: None,
                image: None,
            })
            .await
            .unwrap();

        let updated = repo
            .update_content(post.id, "after".to_string(), None, Some("posts/x.gif".into()))
            .await
            .unwrap();

        assert_eq!(updated.text, "after");
        assert_eq!(updated.author_id, author);
        assert_eq!(updated.pub_date, post.pub_date);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.save(User::new("auth".to_string(), "h".to_string()))
            .await
            .unwrap();
        let err = repo
            .save(User::new("auth".to_string(), "h".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }
}
