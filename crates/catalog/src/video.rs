use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidcat_core::{DomainError, DomainResult, Entity, VideoId};

pub const TITLE_MAX_LEN: usize = 255;
pub const URL_MAX_LEN: usize = 2048;
pub const DESCRIPTION_MAX_LEN: usize = 5000;

/// A video as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    /// Non-negative; only ever moved by the increment operation.
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl Entity for Video {
    type Id = VideoId;

    fn id(&self) -> VideoId {
        self.id
    }
}

/// Validated input for inserting a video.
///
/// Fields are trimmed; a blank description is stored as `NULL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    title: String,
    description: Option<String>,
    url: String,
}

impl NewVideo {
    pub fn new(
        title: impl AsRef<str>,
        url: impl AsRef<str>,
        description: Option<impl AsRef<str>>,
    ) -> DomainResult<Self> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(DomainError::validation(format!(
                "title cannot exceed {TITLE_MAX_LEN} characters"
            )));
        }

        let url = url.as_ref().trim();
        if url.is_empty() {
            return Err(DomainError::validation("url cannot be empty"));
        }
        if url.chars().count() > URL_MAX_LEN {
            return Err(DomainError::validation(format!(
                "url cannot exceed {URL_MAX_LEN} characters"
            )));
        }

        let description = match description {
            Some(d) => {
                let d = d.as_ref().trim();
                if d.chars().count() > DESCRIPTION_MAX_LEN {
                    return Err(DomainError::validation(format!(
                        "description cannot exceed {DESCRIPTION_MAX_LEN} characters"
                    )));
                }
                (!d.is_empty()).then(|| d.to_string())
            }
            None => None,
        };

        Ok(Self {
            title: title.to_string(),
            description,
            url: url.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Materialize the row a store would produce for this input.
    pub fn into_video(self, id: VideoId, created_at: DateTime<Utc>) -> Video {
        Video {
            id,
            title: self.title,
            description: self.description,
            url: self.url,
            views: 0,
            created_at,
        }
    }
}
