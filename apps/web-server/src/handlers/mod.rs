//! HTTP route handlers.

pub mod about;
pub mod auth;
pub mod feed;
pub mod posts;
pub mod profile;

use std::collections::HashMap;

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;
use uuid::Uuid;

use lenta_core::domain::Post;
use lenta_shared::PostCard;

use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

/// Query string carrying the raw, untrusted page parameter.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Wrap rendered markup in a 200 response.
pub fn html_response(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// 302 to an internal path.
pub fn redirect(target: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .finish()
}

/// Resolve posts into display cards, memoizing author and group lookups
/// across the batch.
pub(crate) async fn post_cards(
    state: &AppState,
    posts: Vec<Post>,
) -> AppResult<Vec<PostCard>> {
    let mut authors: HashMap<Uuid, String> = HashMap::new();
    let mut groups: HashMap<Uuid, String> = HashMap::new();
    let mut cards = Vec::with_capacity(posts.len());

    for post in posts {
        let author = match authors.get(&post.author_id) {
            Some(name) => name.clone(),
            None => {
                let user = state
                    .users
                    .find_by_id(post.author_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Internal(format!("post {} has no author", post.id))
                    })?;
                authors.insert(post.author_id, user.username.clone());
                user.username
            }
        };

        let group = match post.group_id {
            None => None,
            Some(group_id) => match groups.get(&group_id) {
                Some(title) => Some(title.clone()),
                None => {
                    let title = state
                        .groups
                        .find_by_id(group_id)
                        .await?
                        .map(|g| g.title)
                        .unwrap_or_default();
                    groups.insert(group_id, title.clone());
                    Some(title)
                }
            },
        };

        cards.push(PostCard {
            id: post.id,
            text: post.text,
            author,
            pub_date: post.pub_date.to_rfc3339(),
            group,
            image: post.image,
        });
    }

    Ok(cards)
}

/// Catch-all: any unmatched path gets the custom not-found page.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(render::not_found_page())
}

/// Register every route. Paths keep their trailing slashes; follow and
/// unfollow accept GET links as well as form posts.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::index))
        .route("/group/{slug}/", web::get().to(feed::group_posts))
        .route("/follow/", web::get().to(feed::follow_index))
        .route("/create/", web::get().to(posts::create_form))
        .route("/create/", web::post().to(posts::create))
        .route("/posts/{id}/", web::get().to(posts::detail))
        .route("/posts/{id}/edit/", web::get().to(posts::edit_form))
        .route("/posts/{id}/edit/", web::post().to(posts::edit))
        .route("/posts/{id}/comment/", web::post().to(posts::add_comment))
        .route("/profile/{username}/", web::get().to(profile::profile))
        .service(
            web::resource("/profile/{username}/follow/")
                .route(web::get().to(profile::follow))
                .route(web::post().to(profile::follow)),
        )
        .service(
            web::resource("/profile/{username}/unfollow/")
                .route(web::get().to(profile::unfollow))
                .route(web::post().to(profile::unfollow)),
        )
        .route("/auth/login/", web::get().to(auth::login_form))
        .route("/auth/login/", web::post().to(auth::login))
        .service(
            web::resource("/auth/logout/")
                .route(web::get().to(auth::logout))
                .route(web::post().to(auth::logout)),
        )
        .route("/about/author/", web::get().to(about::author))
        .route("/about/tech/", web::get().to(about::tech));
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;

    use crate::test_support::{TestContext, body_string, init_app};

    #[actix_web::test]
    async fn unknown_path_renders_the_custom_404_page() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/unexisting_page/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = body_string(res).await;
        assert!(body.contains("Кастомная страница"));
    }

    #[actix_web::test]
    async fn authenticated_viewer_gets_the_same_404() {
        let ctx = TestContext::new();
        let user = ctx.create_user("auth", "pw").await;
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/unexisting_page/")
                .cookie(ctx.session_cookie(&user))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn static_about_pages_are_served() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        for uri in ["/about/author/", "/about/tech/"] {
            let res =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }
}
