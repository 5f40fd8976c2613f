//! # Lenta Core
//!
//! The domain layer of the Lenta blogging platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, feed pagination, the edit/follow authorization guard, form
//! validation, and the ports infrastructure must implement.

pub mod domain;
pub mod error;
pub mod guard;
pub mod pagination;
pub mod ports;
pub mod validation;

pub use error::RepoError;
