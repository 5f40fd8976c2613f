//! Login and logout.
//!
//! Successful login sets the session cookie and honors `?next=` so a user
//! bounced off a gated route lands back where they were headed. Only
//! site-relative targets are followed.

use std::sync::Arc;

use actix_web::cookie::{Cookie, time::Duration as CookieDuration};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use lenta_core::ports::{PasswordService, TokenService};
use lenta_shared::LoginForm;

use crate::middleware::auth::SESSION_COOKIE;
use crate::middleware::error::{AppError, AppResult};
use crate::render;
use crate::state::AppState;

use super::html_response;

const BAD_CREDENTIALS: &str = "Неверное имя пользователя или пароль";

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: String,
}

fn safe_next(next: &str) -> &str {
    // Only site-relative redirect targets; anything else goes home.
    if next.starts_with('/') && !next.starts_with("//") {
        next
    } else {
        "/"
    }
}

/// The login form, carrying the return path through a hidden field.
pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    html_response(render::login_page(&query.next, None))
}

/// Authenticate and set the session cookie.
pub async fn login(
    state: web::Data<AppState>,
    tokens: web::Data<Arc<dyn TokenService>>,
    passwords: web::Data<Arc<dyn PasswordService>>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();

    let user = state.users.find_by_username(&form.username).await?;
    let verified = match &user {
        Some(user) => passwords
            .verify(&form.password, &user.password_hash)
            .map_err(|e| AppError::Internal(e.to_string()))?,
        None => false,
    };

    let Some(user) = user.filter(|_| verified) else {
        tracing::debug!(username = %form.username, "login rejected");
        return Ok(html_response(render::login_page(
            &form.next,
            Some(BAD_CREDENTIALS),
        )));
    };

    let token = tokens
        .generate_token(user.id, &user.username)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let cookie = Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::seconds(tokens.expiration_seconds()))
        .finish();

    tracing::info!(username = %user.username, "login succeeded");
    Ok(HttpResponse::Found()
        .cookie(cookie)
        .insert_header(("Location", safe_next(&form.next).to_string()))
        .finish())
}

/// Drop the session cookie and go home.
pub async fn logout() -> HttpResponse {
    let expired = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .max_age(CookieDuration::ZERO)
        .finish();

    HttpResponse::Found()
        .cookie(expired)
        .insert_header(("Location", "/"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::safe_next;

    #[test]
    fn only_site_relative_next_targets_are_followed() {
        assert_eq!(safe_next("/create/"), "/create/");
        assert_eq!(safe_next(""), "/");
        assert_eq!(safe_next("https://evil.example"), "/");
        assert_eq!(safe_next("//evil.example"), "/");
    }
}
