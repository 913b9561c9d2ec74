//! Read-side query parameters: pagination, leaderboards and text search.

use vidcat_core::{DomainError, DomainResult};

use crate::video::Video;

/// Cap for the "top" leaderboards (views, recent favorites).
pub const TOP_LIMIT: i64 = 10;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

pub const SEARCH_QUERY_MAX_LEN: usize = 200;
pub const SEARCH_RESULT_LIMIT: i64 = 100;

/// Offset pagination over videos ordered by id.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    skip: i64,
    limit: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> DomainResult<Self> {
        let skip = skip.unwrap_or(0);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);

        if skip < 0 {
            return Err(DomainError::validation("skip must be >= 0"));
        }
        if !(0..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(DomainError::validation(format!(
                "limit must be between 0 and {MAX_PAGE_LIMIT}"
            )));
        }

        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> i64 {
        self.skip
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Apply the window to an already-ordered sequence.
    pub fn slice<T: Clone>(&self, ordered: &[T]) -> Vec<T> {
        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(0);
        ordered.iter().skip(skip).take(limit).cloned().collect()
    }
}

/// Free-text video search.
///
/// Matching is a case-insensitive substring test against the title or the
/// description. Wildcard characters in the input match literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    folded: String,
}

impl SearchQuery {
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let text = raw.as_ref().trim();
        if text.is_empty() {
            return Err(DomainError::validation("query cannot be empty"));
        }
        if text.chars().count() > SEARCH_QUERY_MAX_LEN {
            return Err(DomainError::validation(format!(
                "query cannot exceed {SEARCH_QUERY_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            text: text.to_string(),
            folded: text.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn matches(&self, video: &Video) -> bool {
        video.title.to_lowercase().contains(&self.folded)
            || video
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.folded))
    }

    /// `ILIKE` pattern with `\` as the escape character.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.text.len() + 2);
        pattern.push('%');
        for c in self.text.chars() {
            if matches!(c, '\\' | '%' | '_') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}
