//! Request-scoped catalog session.
//!
//! Handlers take a [`Session`] argument instead of reaching for a shared
//! handle. The extractor checks a session out of the store before the handler
//! body runs; the session is dropped (and its connection released) when the
//! handler returns, whatever the outcome.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use vidcat_infra::CatalogSession;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub struct Session(Box<dyn CatalogSession>);

impl Session {
    pub fn new(inner: Box<dyn CatalogSession>) -> Self {
        Self(inner)
    }
}

impl Deref for Session {
    type Target = dyn CatalogSession;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let services = parts
            .extensions
            .get::<Arc<AppServices>>()
            .cloned()
            .ok_or_else(|| ApiError::Internal("catalog services not installed on router".to_string()))?;

        let session = services.session().await?;
        Ok(Session::new(session))
    }
}
