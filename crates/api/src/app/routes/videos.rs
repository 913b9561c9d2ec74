use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};

use vidcat_catalog::{SEARCH_RESULT_LIMIT, TOP_LIMIT, Video};
use vidcat_core::VideoId;

use crate::app::dto;
use crate::app::errors::{ApiError, VIDEO_NOT_FOUND};
use crate::app::routes::common::parse_id;
use crate::session::Session;

pub async fn create_video(
    mut session: Session,
    body: Result<Json<dto::VideoCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<Video>), ApiError> {
    let Json(body) = body?;
    let new_video = body.validate()?;

    let video = session.create_video(&new_video).await?;
    tracing::info!(video_id = %video.id, "video created");

    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn get_video(
    mut session: Session,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;

    session
        .get_video(video_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(VIDEO_NOT_FOUND))
}

pub async fn list_videos(
    mut session: Session,
    params: Result<Query<dto::ListVideosParams>, QueryRejection>,
) -> Result<Json<Vec<Video>>, ApiError> {
    let Query(params) = params?;
    let page = params.page()?;

    Ok(Json(session.list_videos(page).await?))
}

pub async fn top_videos_by_views(mut session: Session) -> Result<Json<Vec<Video>>, ApiError> {
    Ok(Json(session.top_videos_by_views(TOP_LIMIT).await?))
}

pub async fn search_videos(
    mut session: Session,
    params: Result<Query<dto::SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Video>>, ApiError> {
    let Query(params) = params?;
    let query = params.search_query()?;

    Ok(Json(session.search_videos(&query, SEARCH_RESULT_LIMIT).await?))
}

pub async fn increment_views(
    mut session: Session,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;

    session
        .increment_video_views(video_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(VIDEO_NOT_FOUND))
}
