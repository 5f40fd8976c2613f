#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use lenta_core::domain::Post;
    use lenta_core::ports::{PostRepository, UserRepository};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_find_post_by_id() {
        let author_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: 7,
                author_id,
                text: "Тестовый текст".to_owned(),
                pub_date: now.into(),
                group_id: None,
                image: Some("posts/small.gif".to_owned()),
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(7).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.text, "Тестовый текст");
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.image.as_deref(), Some("posts/small.gif"));
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let user_id = uuid::Uuid::new_v4();
        let now = chrono::Utc::now();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: user_id,
                username: "auth".to_owned(),
                password_hash: "hash".to_owned(),
                created_at: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user = repo.find_by_username("auth").await.unwrap().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.username, "auth");
    }

    #[tokio::test]
    async fn test_find_by_authors_empty_input_skips_the_query() {
        // No expectations appended: hitting the database would panic.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresPostRepository::new(db);

        let posts = repo.find_by_authors(&[]).await.unwrap();
        assert!(posts.is_empty());
    }
}
