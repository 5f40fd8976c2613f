//! PostgreSQL repository implementations.
//!
//! Every post-listing query orders by `pub_date` descending explicitly; the
//! store never relies on implicit ordering. Follow-edge creation goes through
//! `INSERT ... ON CONFLICT DO NOTHING` so the uniqueness check and the insert
//! are one atomic statement.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DbConn, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TryInsertResult,
};
use uuid::Uuid;

use lenta_core::domain::{Comment, Follow, Group, NewComment, NewPost, Post, User};
use lenta_core::error::RepoError;
use lenta_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::PostgresBaseRepository;

fn query_err(e: DbErr) -> RepoError {
    RepoError::Query(e.to_string())
}

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn newest_first() -> sea_orm::Select<PostEntity> {
        PostEntity::find()
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            author_id: Set(new.author_id),
            text: Set(new.text),
            pub_date: Set(Utc::now().into()),
            group_id: Set(new.group_id),
            image: Set(new.image),
        };

        let inserted = model.insert(&self.db).await.map_err(query_err)?;
        Ok(inserted.into())
    }

    async fn update_content(
        &self,
        id: i64,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: Set(id),
            text: Set(text),
            group_id: Set(group_id),
            image: Set(image),
            ..Default::default()
        };

        let updated = model.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => RepoError::NotFound,
            other => query_err(other),
        })?;
        Ok(updated.into())
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = PostEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_recent(&self) -> Result<Vec<Post>, RepoError> {
        let result = Self::newest_first().all(&self.db).await.map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_group(&self, group_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = Self::newest_first()
            .filter(post::Column::GroupId.eq(group_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = Self::newest_first()
            .filter(post::Column::AuthorId.eq(author_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_authors(&self, author_ids: &[Uuid]) -> Result<Vec<Post>, RepoError> {
        if author_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Self::newest_first()
            .filter(post::Column::AuthorId.is_in(author_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL comment repository.
pub struct PostgresCommentRepository {
    db: DbConn,
}

impl PostgresCommentRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new.post_id),
            author_id: Set(new.author_id),
            text: Set(new.text),
            created: Set(Utc::now().into()),
        };

        let inserted = model.insert(&self.db).await.map_err(query_err)?;
        Ok(inserted.into())
    }

    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::Created)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// PostgreSQL follow repository.
pub struct PostgresFollowRepository {
    db: DbConn,
}

impl PostgresFollowRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, new: Follow) -> Result<bool, RepoError> {
        let model: follow::ActiveModel = new.into();

        let result = FollowEntity::insert(model)
            .on_conflict(
                OnConflict::columns([follow::Column::UserId, follow::Column::AuthorId])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await
            .map_err(query_err)?;

        Ok(matches!(result, TryInsertResult::Inserted(_)))
    }

    async fn unfollow(&self, user_id: Uuid, author_id: Uuid) -> Result<(), RepoError> {
        // 0 rows affected means there was no edge; still a success.
        FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(query_err)?;
        Ok(())
    }

    async fn is_following(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let found = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .one(&self.db)
            .await
            .map_err(query_err)?;
        Ok(found.is_some())
    }

    async fn following_of(&self, user_id: Uuid) -> Result<Vec<Uuid>, RepoError> {
        let edges = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(query_err)?;
        Ok(edges.into_iter().map(|e| e.author_id).collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        FollowEntity::find().count(&self.db).await.map_err(query_err)
    }
}
