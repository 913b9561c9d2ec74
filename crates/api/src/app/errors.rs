use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use vidcat_core::DomainError;
use vidcat_infra::StoreError;

pub const VIDEO_NOT_FOUND: &str = "Video not found";
pub const FAVORITE_NOT_FOUND: &str = "Favorite item not found";

/// Every failure a handler can produce, mapped to HTTP in one place.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed body, query, or path parameter.
    Validation(String),
    NotFound(&'static str),
    Unavailable(String),
    Internal(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ApiError::Validation(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::VideoNotFound(_) => ApiError::NotFound(VIDEO_NOT_FOUND),
            StoreError::Unavailable(msg) => ApiError::Unavailable(msg),
            e @ (StoreError::Query(_) | StoreError::Decode(_)) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                json_error(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg)
            }
            ApiError::NotFound(detail) => json_error(StatusCode::NOT_FOUND, "not_found", detail),
            ApiError::Unavailable(msg) => {
                tracing::warn!("catalog store unavailable: {msg}");
                json_error(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "store_unavailable",
                    "catalog store is unavailable",
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("request failed: {msg}");
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "store_error",
                    "internal server error",
                )
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, detail: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "detail": detail.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidcat_core::VideoId;

    fn status_of(err: impl Into<ApiError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn domain_errors_are_unprocessable() {
        assert_eq!(
            status_of(DomainError::validation("bad")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(DomainError::invalid_id("VideoId: nope")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn store_errors_map_to_http() {
        assert_eq!(
            status_of(StoreError::VideoNotFound(VideoId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(StoreError::Unavailable("pool closed".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(StoreError::Query("syntax".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(StoreError::Decode("column".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
