//! Catalog data access.
//!
//! A [`CatalogStore`] hands out one [`CatalogSession`] per logical operation
//! (one HTTP request). The session owns whatever the backend needs for that
//! scope (a pooled connection for Postgres) and gives it back on drop, so
//! release happens on success, error and unwinding alike.
//!
//! Every session method runs exactly one logical query and returns plain
//! records. Relationships are never loaded implicitly: comments of a video are
//! fetched with [`CatalogSession::list_comments`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use vidcat_catalog::{
    Comment, Favorite, FavoriteVideo, NewComment, NewVideo, Page, SearchQuery, Video,
};
use vidcat_core::{FavoriteId, VideoId};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Data access error.
///
/// These are infrastructure errors; absence of a looked-up row is reported as
/// `Ok(None)`, not as an error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A write referenced a video that does not exist.
    #[error("video {0} does not exist")]
    VideoNotFound(VideoId),

    /// The backend could not be reached (pool closed, acquire timeout, IO).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("failed to decode row: {0}")]
    Decode(String),
}

/// Factory for request-scoped sessions.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Short backend name for logs (`"postgres"`, `"in-memory"`).
    fn kind(&self) -> &'static str;

    /// Acquire a session. Dropping it releases the underlying resource.
    async fn session(&self) -> Result<Box<dyn CatalogSession>, StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    async fn session(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        (**self).session().await
    }
}

/// Request-scoped handle to the catalog.
#[async_trait]
pub trait CatalogSession: Send {
    /// Round-trip to the backend (readiness probe).
    async fn ping(&mut self) -> Result<(), StoreError>;

    /// Insert a video with zero views and return it with its assigned id.
    async fn create_video(&mut self, video: &NewVideo) -> Result<Video, StoreError>;

    async fn get_video(&mut self, id: VideoId) -> Result<Option<Video>, StoreError>;

    /// Videos ordered by id ascending, windowed by `page`.
    async fn list_videos(&mut self, page: Page) -> Result<Vec<Video>, StoreError>;

    /// Attach a comment; `StoreError::VideoNotFound` if the video is missing.
    async fn create_comment(
        &mut self,
        video_id: VideoId,
        comment: &NewComment,
    ) -> Result<Comment, StoreError>;

    /// Comments of one video ordered by id ascending. `None` if the video is missing.
    async fn list_comments(&mut self, video_id: VideoId) -> Result<Option<Vec<Comment>>, StoreError>;

    /// Mark a video as favorited; `StoreError::VideoNotFound` if the video is missing.
    async fn create_favorite(&mut self, video_id: VideoId) -> Result<Favorite, StoreError>;

    /// Delete a favorite, returning the removed row or `None` if it was absent.
    async fn delete_favorite(&mut self, id: FavoriteId) -> Result<Option<Favorite>, StoreError>;

    /// Highest view counts first, ties broken by id ascending.
    async fn top_videos_by_views(&mut self, limit: i64) -> Result<Vec<Video>, StoreError>;

    /// Most recently created favorites first (ties by favorite id descending), joined with their video.
    async fn recent_favorite_videos(&mut self, limit: i64) -> Result<Vec<FavoriteVideo>, StoreError>;

    /// Case-insensitive substring search over title and description, ordered by id.
    async fn search_videos(
        &mut self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Video>, StoreError>;

    /// Atomically add one view. `None` if the video is missing.
    async fn increment_video_views(&mut self, id: VideoId) -> Result<Option<Video>, StoreError>;
}
