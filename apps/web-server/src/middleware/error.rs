//! Request-boundary error handling.
//!
//! Every failure is recovered here; none are fatal to the serving process.
//! The taxonomy mirrors the platform rules: missing entities render the
//! custom not-found page, ownership violations are silent redirects, and
//! only genuine infrastructure failures surface as 500s.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use std::fmt;

use lenta_core::error::RepoError;
use lenta_core::ports::{CacheError, MediaError};

use crate::render;

/// Application-level error type for handlers.
#[derive(Debug)]
pub enum AppError {
    /// Referenced entity does not exist: 404 with the custom page.
    NotFound,
    /// Silent redirect (non-author edit, post-mutation bounce).
    Redirect(String),
    /// Infrastructure failure; detail is logged, a generic page served.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound => write!(f, "Not found"),
            AppError::Redirect(target) => write!(f, "Redirect to {target}"),
            AppError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Redirect(_) => StatusCode::FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(render::not_found_page()),
            AppError::Redirect(target) => HttpResponse::Found()
                .insert_header((header::LOCATION, target.clone()))
                .finish(),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                HttpResponse::InternalServerError()
                    .content_type("text/html; charset=utf-8")
                    .body(render::server_error_page())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound,
            RepoError::Constraint(msg) => {
                tracing::warn!("Constraint violation: {}", msg);
                AppError::Internal(msg)
            }
            RepoError::Connection(msg) | RepoError::Query(msg) => {
                tracing::error!("Database error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        // The cache is never a correctness dependency.
        AppError::Internal(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
