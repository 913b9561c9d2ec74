//! Video catalog records and validated inputs.
//!
//! This crate holds the plain data shapes exchanged between the router and the
//! data access layer, plus the input rules applied before anything reaches the
//! store (no IO, no HTTP, no storage).

pub mod comment;
pub mod favorite;
pub mod query;
pub mod video;

pub use comment::{COMMENT_MAX_LEN, Comment, NewComment};
pub use favorite::{Favorite, FavoriteVideo};
pub use query::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, SEARCH_QUERY_MAX_LEN, SEARCH_RESULT_LIMIT, SearchQuery,
    TOP_LIMIT,
};
pub use video::{DESCRIPTION_MAX_LEN, NewVideo, TITLE_MAX_LEN, URL_MAX_LEN, Video};
