use axum::{
    Json,
    extract::{Path, rejection::JsonRejection},
};

use vidcat_catalog::Comment;
use vidcat_core::VideoId;

use crate::app::dto;
use crate::app::errors::{ApiError, VIDEO_NOT_FOUND};
use crate::app::routes::common::parse_id;
use crate::session::Session;

pub async fn create_comment(
    mut session: Session,
    Path(video_id): Path<String>,
    body: Result<Json<dto::CommentCreate>, JsonRejection>,
) -> Result<Json<Comment>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;
    let Json(body) = body?;
    let new_comment = body.validate()?;

    let comment = session.create_comment(video_id, &new_comment).await?;
    tracing::info!(video_id = %video_id, comment_id = %comment.id, "comment created");

    Ok(Json(comment))
}

pub async fn list_comments(
    mut session: Session,
    Path(video_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let video_id: VideoId = parse_id(&video_id)?;

    session
        .list_comments(video_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(VIDEO_NOT_FOUND))
}
