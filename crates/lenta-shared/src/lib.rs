//! # Lenta Shared
//!
//! Form payloads and view models shared between the handlers and the
//! page-rendering layer.

pub mod dto;

pub use dto::{CommentForm, CommentView, LoginForm, PostCard, PostForm};
