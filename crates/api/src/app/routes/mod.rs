use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub mod comments;
pub mod common;
pub mod favorites;
pub mod system;
pub mod videos;

/// Router for every catalog endpoint plus the probes.
///
/// The static `/videos/top/...` and `/videos/search/` routes take priority
/// over `/videos/:video_id`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/ready", get(system::ready))
        .route("/videos/", post(videos::create_video).get(videos::list_videos))
        .route("/videos/top/views/", get(videos::top_videos_by_views))
        .route("/videos/top/favorites/", get(favorites::recent_favorite_videos))
        .route("/videos/search/", get(videos::search_videos))
        .route("/videos/:video_id", get(videos::get_video))
        .route(
            "/videos/:video_id/increment_views/",
            put(videos::increment_views),
        )
        .route(
            "/videos/:video_id/comments/",
            post(comments::create_comment).get(comments::list_comments),
        )
        .route("/videos/:video_id/favorites/", post(favorites::create_favorite))
        .route("/favorites/:favorite_id", delete(favorites::delete_favorite))
}
