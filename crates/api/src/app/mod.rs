//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection and wiring (Postgres or in-memory)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request bodies and query parameters
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    routes::router()
        .layer(Extension(Arc::new(services)))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
