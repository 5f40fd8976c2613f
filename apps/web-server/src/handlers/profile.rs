//! Author profiles and the follow graph endpoints.
//!
//! Follow and unfollow are idempotent: repeating either leaves the graph
//! exactly as one application left it. Self-follow is rejected without an
//! error page, the browser just lands back on the profile.

use actix_web::{HttpResponse, web};

use lenta_core::domain::Follow;
use lenta_core::guard;
use lenta_core::pagination::paginate;

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

use super::{PageQuery, html_response, post_cards, redirect};

fn profile_path(username: &str) -> String {
    format!("/profile/{username}/")
}

/// An author's profile: their posts newest first, plus the follow button
/// for authenticated viewers looking at someone else's page.
pub async fn profile(
    state: web::Data<AppState>,
    username: web::Path<String>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    let posts = state.posts.find_by_author(author.id).await?;
    let post_count = posts.len();
    let cards = post_cards(&state, posts).await?;
    let page = paginate(cards, query.page.as_deref());

    let follow_state = match &viewer.0 {
        Some(v) if guard::can_follow(v.user_id, author.id) => {
            Some(state.follows.is_following(v.user_id, author.id).await?)
        }
        _ => None,
    };

    Ok(html_response(render::profile_page(
        &author.username,
        post_count,
        &page,
        follow_state,
    )))
}

/// Follow an author. Duplicate requests and self-follow attempts change
/// nothing.
pub async fn follow(
    identity: Identity,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    if guard::can_follow(identity.user_id, author.id) {
        let inserted = state
            .follows
            .follow(Follow::new(identity.user_id, author.id))
            .await?;
        if inserted {
            tracing::info!(follower = %identity.username, author = %author.username, "followed");
        }
    }

    Ok(redirect(&profile_path(&author.username)))
}

/// Unfollow an author; a missing edge is a no-op.
pub async fn unfollow(
    identity: Identity,
    state: web::Data<AppState>,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or(AppError::NotFound)?;

    state.follows.unfollow(identity.user_id, author.id).await?;

    Ok(redirect(&profile_path(&author.username)))
}
