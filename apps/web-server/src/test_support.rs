//! Shared fixtures for handler scenario tests.
//!
//! Tests run the real routing table against the in-memory state; the only
//! difference from production wiring is a fixed JWT secret.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, Error, test, web};

use lenta_core::domain::{Group, NewPost, Post, User};
use lenta_core::ports::{PasswordService, TokenService};
use lenta_infra::auth::JwtConfig;
use lenta_infra::{Argon2PasswordService, JwtTokenService};

use crate::handlers;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

pub struct TestContext {
    pub state: AppState,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
}

impl TestContext {
    pub fn new() -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            expiration_hours: 1,
            issuer: "lenta".to_string(),
        }));
        Self {
            state: AppState::in_memory(Duration::from_secs(20)),
            tokens,
            passwords: Arc::new(Argon2PasswordService::new()),
        }
    }

    pub async fn create_user(&self, username: &str, password: &str) -> User {
        let hash = self.passwords.hash(password).unwrap();
        self.state
            .users
            .save(User::new(username.to_string(), hash))
            .await
            .unwrap()
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> Group {
        self.state
            .groups
            .save(Group::new(
                title.to_string(),
                slug.to_string(),
                format!("{title} description"),
            ))
            .await
            .unwrap()
    }

    pub async fn seed_post(&self, author: &User, text: &str) -> Post {
        self.state
            .posts
            .create(NewPost {
                author_id: author.id,
                text: text.to_string(),
                group_id: None,
                image: None,
            })
            .await
            .unwrap()
    }

    pub fn session_cookie(&self, user: &User) -> Cookie<'static> {
        let token = self
            .tokens
            .generate_token(user.id, &user.username)
            .unwrap();
        Cookie::build(SESSION_COOKIE, token).path("/").finish()
    }
}

/// Spin up the full routing table over the context's state.
pub async fn init_app(
    ctx: &TestContext,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(ctx.state.clone()))
            .app_data(web::Data::new(ctx.tokens.clone()))
            .app_data(web::Data::new(ctx.passwords.clone()))
            .configure(handlers::configure_routes)
            .default_service(web::route().to(handlers::not_found)),
    )
    .await
}

/// Read a response body to a UTF-8 string.
pub async fn body_string(res: ServiceResponse<impl MessageBody>) -> String {
    let bytes = test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}
