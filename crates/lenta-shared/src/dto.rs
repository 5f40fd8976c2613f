//! Form payloads and view models.
//!
//! Forms arrive urlencoded from server-rendered pages; empty optional fields
//! come through as empty strings and are normalized by the handlers. View
//! models carry everything a page needs already resolved (author handles,
//! group titles), so rendering stays a pure function of its inputs.

use serde::{Deserialize, Serialize};

/// Submitted post form: create and edit share it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostForm {
    pub text: String,
    /// Group id as a string; empty means "no group".
    #[serde(default)]
    pub group: String,
    /// Uploaded file name; empty means "no image change".
    #[serde(default)]
    pub image: String,
}

/// Submitted comment form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: String,
}

/// Submitted login form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Return path to go back to after authenticating.
    #[serde(default)]
    pub next: String,
}

/// A post resolved for display in a feed or detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCard {
    pub id: i64,
    pub text: String,
    pub author: String,
    /// RFC 3339 publication timestamp.
    pub pub_date: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

/// A comment resolved for display on a post detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub author: String,
    pub text: String,
    /// RFC 3339 creation timestamp.
    pub created: String,
}
