use axum::{Json, extract::Path};

use vidcat_catalog::{Favorite, FavoriteVideo, TOP_LIMIT};
use vidcat_core::{FavoriteId, VideoId};

use crate::app::dto;
use crate::app::errors::{ApiError, FAVORITE_NOT_FOUND};
use crate::app::routes::common::parse_id;
use crate::session::Session;

pub async fn create_favorite(
    mut session: Session,
    Path(video_id): Path<String>,
) -> Result<Json<Favorite>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;

    let favorite = session.create_favorite(video_id).await?;
    tracing::info!(video_id = %video_id, favorite_id = %favorite.id, "video favorited");

    Ok(Json(favorite))
}

pub async fn delete_favorite(
    mut session: Session,
    Path(favorite_id): Path<String>,
) -> Result<Json<dto::Detail>, ApiError> {
    let favorite_id: FavoriteId = parse_id(&favorite_id)?;

    match session.delete_favorite(favorite_id).await? {
        Some(_) => Ok(Json(dto::Detail {
            detail: "Favorite item deleted",
        })),
        None => Err(ApiError::NotFound(FAVORITE_NOT_FOUND)),
    }
}

pub async fn recent_favorite_videos(
    mut session: Session,
) -> Result<Json<Vec<FavoriteVideo>>, ApiError> {
    Ok(Json(session.recent_favorite_videos(TOP_LIMIT).await?))
}
