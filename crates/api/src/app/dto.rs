use serde::{Deserialize, Serialize};

use vidcat_catalog::{NewComment, NewVideo, Page, SearchQuery};
use vidcat_core::DomainResult;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct VideoCreate {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl VideoCreate {
    pub fn validate(self) -> DomainResult<NewVideo> {
        NewVideo::new(self.title, self.url, self.description)
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentCreate {
    pub content: String,
}

impl CommentCreate {
    pub fn validate(self) -> DomainResult<NewComment> {
        NewComment::new(self.content)
    }
}

/// `GET /videos/?skip=&limit=`
#[derive(Debug, Default, Deserialize)]
pub struct ListVideosParams {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListVideosParams {
    pub fn page(&self) -> DomainResult<Page> {
        Page::new(self.skip, self.limit)
    }
}

/// `GET /videos/search/?query=`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    pub fn search_query(&self) -> DomainResult<SearchQuery> {
        SearchQuery::new(self.query.as_deref().unwrap_or_default())
    }
}

// -------------------------
// Response DTOs
// -------------------------

/// Plain acknowledgement body, e.g. `{"detail": "Favorite item deleted"}`.
#[derive(Debug, Serialize)]
pub struct Detail {
    pub detail: &'static str,
}
