//! `vidcat-core`: shared building blocks for the video catalog.
//!
//! Identifiers and the validation error model. No IO lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CommentId, FavoriteId, VideoId};
