//! Post pages: detail, creation, editing, and commenting.
//!
//! Editing is author-only; a non-author lands back on the detail page with
//! nothing changed. Validation failures re-render the form with the prior
//! input and never touch the store.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use lenta_core::domain::{NewComment, NewPost};
use lenta_core::guard::{self, EditAccess};
use lenta_core::validation::{FieldError, validate_comment_text, validate_post_text};
use lenta_shared::{CommentForm, CommentView, PostForm};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

use super::{html_response, post_cards, redirect};

fn detail_path(post_id: i64) -> String {
    format!("/posts/{post_id}/")
}

/// Resolve the submitted group field. Empty means "no group"; anything else
/// must name an existing group.
async fn resolve_group(
    state: &AppState,
    raw: &str,
) -> AppResult<Result<Option<Uuid>, FieldError>> {
    if raw.is_empty() {
        return Ok(Ok(None));
    }
    let Ok(group_id) = Uuid::parse_str(raw) else {
        return Ok(Err(FieldError::new("group", "Unknown group")));
    };
    match state.groups.find_by_id(group_id).await? {
        Some(group) => Ok(Ok(Some(group.id))),
        None => Ok(Err(FieldError::new("group", "Unknown group"))),
    }
}

/// A single post with its comments.
pub async fn detail(
    state: web::Data<AppState>,
    id: web::Path<i64>,
    viewer: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or(AppError::NotFound)?;

    let viewer_can_edit = viewer
        .0
        .as_ref()
        .is_some_and(|v| guard::can_edit(v.user_id, &post));
    let viewer_can_comment = viewer.0.is_some();

    let comments = state.comments.find_by_post(post.id).await?;
    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = state
            .users
            .find_by_id(comment.author_id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();
        views.push(CommentView {
            author,
            text: comment.text,
            created: comment.created.to_rfc3339(),
        });
    }

    let cards = post_cards(&state, vec![post]).await?;
    let card = cards
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Internal("post card resolution failed".to_string()))?;

    Ok(html_response(render::post_detail_page(
        &card,
        &views,
        viewer_can_edit,
        viewer_can_comment,
    )))
}

/// Blank creation form. Anonymous requests never reach here; the identity
/// extractor already redirected them to login.
pub async fn create_form(
    _identity: Identity,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;
    Ok(html_response(render::post_form_page(
        None,
        &PostForm::default(),
        &groups,
        &[],
    )))
}

/// Create a post and land on the author's profile.
pub async fn create(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let mut errors = validate_post_text(&form.text);
    let group_id = match resolve_group(&state, &form.group).await? {
        Ok(group_id) => group_id,
        Err(err) => {
            errors.push(err);
            None
        }
    };

    if !errors.is_empty() {
        let groups = state.groups.list().await?;
        return Ok(html_response(render::post_form_page(
            None, &form, &groups, &errors,
        )));
    }

    let image = if form.image.is_empty() {
        None
    } else {
        Some(state.media.store(&form.image).await?)
    };

    let post = state
        .posts
        .create(NewPost {
            author_id: identity.user_id,
            text: form.text,
            group_id,
            image,
        })
        .await?;

    tracing::info!(post_id = post.id, author = %identity.username, "post created");
    Ok(redirect(&format!("/profile/{}/", identity.username)))
}

/// Edit form pre-filled with the current content. Non-authors are silently
/// sent to the detail page.
pub async fn edit_form(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or(AppError::NotFound)?;

    if guard::edit_access(identity.user_id, &post) == EditAccess::RedirectToDetail {
        return Err(AppError::Redirect(detail_path(post.id)));
    }

    let form = PostForm {
        text: post.text.clone(),
        group: post.group_id.map(|g| g.to_string()).unwrap_or_default(),
        image: String::new(),
    };
    let groups = state.groups.list().await?;
    Ok(html_response(render::post_form_page(
        Some(post.id),
        &form,
        &groups,
        &[],
    )))
}

/// Apply an edit. An empty image field keeps the existing image.
pub async fn edit(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or(AppError::NotFound)?;

    if guard::edit_access(identity.user_id, &post) == EditAccess::RedirectToDetail {
        return Err(AppError::Redirect(detail_path(post.id)));
    }

    let form = form.into_inner();
    let mut errors = validate_post_text(&form.text);
    let group_id = match resolve_group(&state, &form.group).await? {
        Ok(group_id) => group_id,
        Err(err) => {
            errors.push(err);
            None
        }
    };

    if !errors.is_empty() {
        let groups = state.groups.list().await?;
        return Ok(html_response(render::post_form_page(
            Some(post.id),
            &form,
            &groups,
            &errors,
        )));
    }

    let image = if form.image.is_empty() {
        post.image.clone()
    } else {
        Some(state.media.store(&form.image).await?)
    };

    state
        .posts
        .update_content(post.id, form.text, group_id, image)
        .await?;

    Ok(redirect(&detail_path(post.id)))
}

/// Add a comment. Whatever happens the browser lands back on the detail
/// page; an invalid comment simply is not stored.
pub async fn add_comment(
    identity: Identity,
    state: web::Data<AppState>,
    id: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(*id)
        .await?
        .ok_or(AppError::NotFound)?;

    if validate_comment_text(&form.text).is_empty() {
        state
            .comments
            .create(NewComment {
                post_id: post.id,
                author_id: identity.user_id,
                text: form.into_inner().text,
            })
            .await?;
    }

    Ok(redirect(&detail_path(post.id)))
}
