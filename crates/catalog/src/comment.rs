use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidcat_core::{CommentId, DomainError, DomainResult, Entity, VideoId};

pub const COMMENT_MAX_LEN: usize = 5000;

/// Free-text annotation attached to exactly one video. Never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub video_id: VideoId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    type Id = CommentId;

    fn id(&self) -> CommentId {
        self.id
    }
}

/// Validated comment body (the owning video comes from the path).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    content: String,
}

impl NewComment {
    pub fn new(content: impl AsRef<str>) -> DomainResult<Self> {
        let content = content.as_ref().trim();
        if content.is_empty() {
            return Err(DomainError::validation("content cannot be empty"));
        }
        if content.chars().count() > COMMENT_MAX_LEN {
            return Err(DomainError::validation(format!(
                "content cannot exceed {COMMENT_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            content: content.to_string(),
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_comment(self, id: CommentId, video_id: VideoId, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            video_id,
            content: self.content,
            created_at,
        }
    }
}
