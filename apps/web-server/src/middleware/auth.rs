//! Authentication extractors.
//!
//! The site is server-rendered: an anonymous request to a gated route is not
//! a 401 but a 302 to the login page, carrying the originally requested path
//! in `?next=` so the user lands back where they meant to go.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::future::{Ready, ready};
use std::sync::Arc;

use lenta_core::ports::{TokenClaims, TokenService};

/// Name of the session cookie carrying the JWT.
pub const SESSION_COOKIE: &str = "session";

/// Path of the login entry point.
pub const LOGIN_PATH: &str = "/auth/login/";

/// Characters that must be escaped when a path is carried inside a query
/// value. Slashes stay literal so the redirect target remains readable.
const NEXT_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'>')
    .add(b'?');

/// Authenticated user identity extractor.
///
/// Use this in handlers to require authentication:
/// ```ignore
/// async fn create_post(identity: Identity) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Redirect-to-login produced when a gated route is hit anonymously.
#[derive(Debug)]
pub struct LoginRedirect {
    next: String,
}

impl std::fmt::Display for LoginRedirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "authentication required, next={}", self.next)
    }
}

impl actix_web::ResponseError for LoginRedirect {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let next = utf8_percent_encode(&self.next, NEXT_VALUE);
        actix_web::HttpResponse::Found()
            .insert_header((header::LOCATION, format!("{LOGIN_PATH}?next={next}")))
            .finish()
    }
}

fn token_from_request(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    // Bearer tokens stay accepted for non-browser clients.
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(String::from)
}

fn authenticate(req: &HttpRequest) -> Option<Identity> {
    let token_service = match req.app_data::<actix_web::web::Data<Arc<dyn TokenService>>>() {
        Some(service) => service,
        None => {
            tracing::error!("TokenService not found in app data");
            return None;
        }
    };

    let token = token_from_request(req)?;
    match token_service.validate_token(&token) {
        Ok(claims) => Some(Identity::from(claims)),
        Err(e) => {
            tracing::debug!(error = %e, "Session token rejected");
            None
        }
    }
}

impl FromRequest for Identity {
    type Error = LoginRedirect;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match authenticate(req) {
            Some(identity) => ready(Ok(identity)),
            None => ready(Err(LoginRedirect {
                next: req.path().to_string(),
            })),
        }
    }
}

/// Optional identity extractor - doesn't redirect if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    fn location(redirect: &LoginRedirect) -> String {
        redirect
            .error_response()
            .headers()
            .get(header::LOCATION)
            .expect("redirect must carry a Location header")
            .to_str()
            .expect("Location must be ASCII")
            .to_string()
    }

    #[test]
    fn plain_path_passes_through_unescaped() {
        let redirect = LoginRedirect {
            next: "/profile/author/follow/".to_string(),
        };
        assert_eq!(
            location(&redirect),
            "/auth/login/?next=/profile/author/follow/"
        );
    }

    #[test]
    fn query_delimiters_in_next_are_escaped() {
        let redirect = LoginRedirect {
            next: "/profile/a&b/follow/?x=1".to_string(),
        };
        assert_eq!(
            location(&redirect),
            "/auth/login/?next=/profile/a%26b/follow/%3Fx=1"
        );
    }
}
