//! Feed pages: the public index, group feeds, and the personalized feed.

use actix_web::{HttpResponse, web};

use lenta_core::pagination::{paginate, parse_page_param};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

use super::{PageQuery, html_response, post_cards};

fn index_cache_key(page_number: usize) -> String {
    format!("feed:index:page:{page_number}")
}

/// Public index feed. The rendered page is memoized per page number; within
/// the TTL a repeat request replays the stored bytes even if the store has
/// moved on.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let requested = parse_page_param(query.page.as_deref()).unwrap_or(1);

    if let Some(cached) = state.cache.get(&index_cache_key(requested)).await {
        tracing::debug!(page = requested, "index cache hit");
        return Ok(html_response(cached));
    }

    let posts = state.posts.find_recent().await?;
    let cards = post_cards(&state, posts).await?;
    let page = paginate(cards, query.page.as_deref());

    // An out-of-range page number clamps to the last page; keying on the
    // clamped number keeps every overflow request on one cache entry.
    let key = index_cache_key(page.number);
    if page.number != requested {
        if let Some(cached) = state.cache.get(&key).await {
            tracing::debug!(page = page.number, "index cache hit");
            return Ok(html_response(cached));
        }
    }

    let html = render::index_page(&page);

    if let Err(e) = state.cache.set(&key, &html, Some(state.cache_ttl)).await {
        // A failed cache write degrades to recomputing next time.
        tracing::warn!(error = %e, "failed to cache index page");
    }

    Ok(html_response(html))
}

/// One group's feed, newest first. Unknown slug is a 404.
pub async fn group_posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;

    let posts = state.posts.find_by_group(group.id).await?;
    let cards = post_cards(&state, posts).await?;
    let page = paginate(cards, query.page.as_deref());

    Ok(html_response(render::group_page(&group, &page)))
}

/// Personalized feed: posts by every author the viewer follows. A viewer
/// following nobody gets an empty page, not an error.
pub async fn follow_index(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let authors = state.follows.following_of(identity.user_id).await?;
    let posts = state.posts.find_by_authors(&authors).await?;
    let cards = post_cards(&state, posts).await?;
    let page = paginate(cards, query.page.as_deref());

    Ok(html_response(render::follow_page(&page)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::test;

    use crate::test_support::{TestContext, body_string, init_app};

    #[actix_web::test]
    async fn thirteen_posts_paginate_ten_then_three() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        for i in 0..13 {
            ctx.seed_post(&author, &format!("post {i}")).await;
        }
        let app = init_app(&ctx).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert_eq!(body.matches("<article").count(), 10);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/?page=2").to_request()).await;
        let body = body_string(res).await;
        assert_eq!(body.matches("<article").count(), 3);
    }

    #[actix_web::test]
    async fn junk_page_param_serves_first_page() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        for i in 0..13 {
            ctx.seed_post(&author, &format!("post {i}")).await;
        }
        let app = init_app(&ctx).await;

        for uri in ["/?page=abc", "/?page=0", "/?page=999"] {
            let res =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK, "{uri}");
        }
    }

    #[actix_web::test]
    async fn overflow_page_params_share_one_cache_entry() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        for i in 0..13 {
            ctx.seed_post(&author, &format!("post {i}")).await;
        }
        let app = init_app(&ctx).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/?page=999").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK);
        let overflow = body_string(res).await;

        assert!(ctx.state.cache.exists("feed:index:page:2").await);
        assert!(!ctx.state.cache.exists("feed:index:page:999").await);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/?page=2").to_request()).await;
        let last_page = body_string(res).await;
        assert_eq!(overflow, last_page);
    }

    #[actix_web::test]
    async fn cached_index_is_stale_until_cleared() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        ctx.seed_post(&author, "first post").await;
        let app = init_app(&ctx).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let before = body_string(res).await;

        ctx.seed_post(&author, "written after caching").await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let cached = body_string(res).await;
        assert_eq!(before, cached);
        assert!(!cached.contains("written after caching"));

        ctx.state.cache.clear().await.unwrap();

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let fresh = body_string(res).await;
        assert!(fresh.contains("written after caching"));
    }

    #[actix_web::test]
    async fn deleted_post_persists_in_cache_until_clear() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        let post = ctx.seed_post(&author, "soon to be deleted").await;
        let app = init_app(&ctx).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let before = body_string(res).await;
        assert!(before.contains("soon to be deleted"));

        ctx.state.posts.delete(post.id).await.unwrap();

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let cached = body_string(res).await;
        assert_eq!(before, cached);

        ctx.state.cache.clear().await.unwrap();

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let fresh = body_string(res).await;
        assert!(!fresh.contains("soon to be deleted"));
    }

    #[actix_web::test]
    async fn unknown_group_slug_is_not_found() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/group/no-such/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn group_feed_lists_only_group_posts() {
        let ctx = TestContext::new();
        let author = ctx.create_user("auth", "pw").await;
        let group = ctx.create_group("Котики", "cats").await;
        ctx.state
            .posts
            .create(lenta_core::domain::NewPost {
                author_id: author.id,
                text: "grouped post".to_string(),
                group_id: Some(group.id),
                image: None,
            })
            .await
            .unwrap();
        ctx.seed_post(&author, "ungrouped post").await;
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/group/cats/").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("grouped post"));
        assert!(!body.contains("ungrouped post"));
    }

    #[actix_web::test]
    async fn anonymous_follow_feed_redirects_to_login() {
        let ctx = TestContext::new();
        let app = init_app(&ctx).await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/follow/").to_request()).await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/auth/login/?next=/follow/");
    }

    #[actix_web::test]
    async fn follow_feed_shows_only_followed_authors() {
        let ctx = TestContext::new();
        let followed = ctx.create_user("followed", "pw").await;
        let other = ctx.create_user("other", "pw").await;
        let reader = ctx.create_user("reader", "pw").await;
        ctx.seed_post(&followed, "from followed author").await;
        ctx.seed_post(&other, "from someone else").await;
        ctx.state
            .follows
            .follow(lenta_core::domain::Follow::new(reader.id, followed.id))
            .await
            .unwrap();
        let app = init_app(&ctx).await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/follow/")
                .cookie(ctx.session_cookie(&reader))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = body_string(res).await;
        assert!(body.contains("from followed author"));
        assert!(!body.contains("from someone else"));
    }
}
