use axum::http::StatusCode;

use crate::app::errors::ApiError;
use crate::session::Session;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Checks a session out of the store and round-trips once; the session extractor
/// already turns an acquire failure into a 503.
pub async fn ready(mut session: Session) -> Result<StatusCode, ApiError> {
    session.ping().await?;
    Ok(StatusCode::OK)
}
