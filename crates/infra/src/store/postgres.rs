//! Postgres-backed catalog store.
//!
//! ## Sessions
//!
//! [`PostgresCatalogStore::session`] checks one connection out of the SQLx pool
//! and moves it into a [`PostgresSession`]. Every query of that request runs on
//! that connection; dropping the session returns it to the pool.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `VideoNotFound` (insert paths only) |
//! | Database (other) | Any other | `Query` |
//! | PoolTimedOut / PoolClosed / Io / Tls | N/A | `Unavailable` |
//! | ColumnDecode / Decode / ColumnNotFound | N/A | `Decode` |
//! | Other | N/A | `Query` |

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, Row};
use tracing::instrument;

use vidcat_catalog::{
    Comment, Favorite, FavoriteVideo, NewComment, NewVideo, Page, SearchQuery, Video,
};
use vidcat_core::{CommentId, FavoriteId, VideoId};

use super::{CatalogSession, CatalogStore, StoreError};

const VIDEO_COLUMNS: &str = "id, title, description, url, views, created_at";

/// Postgres-backed catalog store.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn session(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        let conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| map_sqlx_error("acquire", e))?;
        Ok(Box::new(PostgresSession { conn }))
    }
}

/// One pooled connection, held for the lifetime of a request.
#[derive(Debug)]
pub struct PostgresSession {
    conn: PoolConnection<Postgres>,
}

impl PostgresSession {
    async fn video_exists(&mut self, id: VideoId) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM videos WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| map_sqlx_error("video_exists", e))
    }
}

#[async_trait]
impl CatalogSession for PostgresSession {
    async fn ping(&mut self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&mut *self.conn)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn create_video(&mut self, video: &NewVideo) -> Result<Video, StoreError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            INSERT INTO videos (title, description, url)
            VALUES ($1, $2, $3)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(video.title())
        .bind(video.description())
        .bind(video.url())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("create_video", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn get_video(&mut self, id: VideoId) -> Result<Option<Video>, StoreError> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("get_video", e))?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn list_videos(&mut self, page: Page) -> Result<Vec<Video>, StoreError> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM videos
            ORDER BY id ASC
            OFFSET $1
            LIMIT $2
            "#
        ))
        .bind(page.skip())
        .bind(page.limit())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("list_videos", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn create_comment(
        &mut self,
        video_id: VideoId,
        comment: &NewComment,
    ) -> Result<Comment, StoreError> {
        if !self.video_exists(video_id).await? {
            return Err(StoreError::VideoNotFound(video_id));
        }

        // The FK still guards a video deleted between the check and the insert.
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (video_id, content)
            VALUES ($1, $2)
            RETURNING id, video_id, content, created_at
            "#,
        )
        .bind(video_id.get())
        .bind(comment.content())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::VideoNotFound(video_id)
            } else {
                map_sqlx_error("create_comment", e)
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn list_comments(&mut self, video_id: VideoId) -> Result<Option<Vec<Comment>>, StoreError> {
        if !self.video_exists(video_id).await? {
            return Ok(None);
        }

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT id, video_id, content, created_at
            FROM comments
            WHERE video_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(video_id.get())
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("list_comments", e))?;

        Ok(Some(rows.into_iter().map(Into::into).collect()))
    }

    #[instrument(skip(self), err)]
    async fn create_favorite(&mut self, video_id: VideoId) -> Result<Favorite, StoreError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (video_id)
            VALUES ($1)
            RETURNING id, video_id, created_at
            "#,
        )
        .bind(video_id.get())
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::VideoNotFound(video_id)
            } else {
                map_sqlx_error("create_favorite", e)
            }
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self), err)]
    async fn delete_favorite(&mut self, id: FavoriteId) -> Result<Option<Favorite>, StoreError> {
        let row = sqlx::query_as::<_, FavoriteRow>(
            "DELETE FROM favorites WHERE id = $1 RETURNING id, video_id, created_at",
        )
        .bind(id.get())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("delete_favorite", e))?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self), err)]
    async fn top_videos_by_views(&mut self, limit: i64) -> Result<Vec<Video>, StoreError> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM videos
            ORDER BY views DESC, id ASC
            LIMIT $1
            "#
        ))
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("top_videos_by_views", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn recent_favorite_videos(&mut self, limit: i64) -> Result<Vec<FavoriteVideo>, StoreError> {
        let rows = sqlx::query_as::<_, FavoriteVideoRow>(
            r#"
            SELECT
                f.id AS favorite_id,
                f.created_at AS favorited_at,
                v.id,
                v.title,
                v.description,
                v.url,
                v.views,
                v.created_at
            FROM favorites f
            JOIN videos v ON v.id = f.video_id
            ORDER BY f.created_at DESC, f.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("recent_favorite_videos", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, query), fields(query = %query.as_str()), err)]
    async fn search_videos(
        &mut self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Video>, StoreError> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            SELECT {VIDEO_COLUMNS}
            FROM videos
            WHERE title ILIKE $1 ESCAPE '\'
               OR description ILIKE $1 ESCAPE '\'
            ORDER BY id ASC
            LIMIT $2
            "#
        ))
        .bind(query.like_pattern())
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("search_videos", e))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self), err)]
    async fn increment_video_views(&mut self, id: VideoId) -> Result<Option<Video>, StoreError> {
        // Single statement: concurrent increments serialize on the row lock.
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET views = views + 1
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id.get())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| map_sqlx_error("increment_video_views", e))?;

        Ok(row.map(Into::into))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Query(format!(
            "database error in {}: {} (code {})",
            operation,
            db_err.message(),
            db_err.code().as_deref().unwrap_or("none")
        )),
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring connection in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::Tls(e) => StoreError::Unavailable(format!("tls error in {}: {}", operation, e)),
        e @ (sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)) => {
            StoreError::Decode(format!("{} in {}", e, operation))
        }
        _ => StoreError::Query(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Check if an error is a foreign key violation.
fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23503";
        }
    }
    false
}

// SQLx row types

#[derive(Debug)]
struct VideoRow {
    id: i64,
    title: String,
    description: Option<String>,
    url: String,
    views: i64,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for VideoRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(VideoRow {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            url: row.try_get("url")?,
            views: row.try_get("views")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: VideoId::new(row.id),
            title: row.title,
            description: row.description,
            url: row.url,
            views: row.views,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
struct CommentRow {
    id: i64,
    video_id: i64,
    content: String,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for CommentRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CommentRow {
            id: row.try_get("id")?,
            video_id: row.try_get("video_id")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: CommentId::new(row.id),
            video_id: VideoId::new(row.video_id),
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
struct FavoriteRow {
    id: i64,
    video_id: i64,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for FavoriteRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(FavoriteRow {
            id: row.try_get("id")?,
            video_id: row.try_get("video_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl From<FavoriteRow> for Favorite {
    fn from(row: FavoriteRow) -> Self {
        Favorite {
            id: FavoriteId::new(row.id),
            video_id: VideoId::new(row.video_id),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug)]
struct FavoriteVideoRow {
    favorite_id: i64,
    favorited_at: DateTime<Utc>,
    video: VideoRow,
}

impl<'r> FromRow<'r, PgRow> for FavoriteVideoRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(FavoriteVideoRow {
            favorite_id: row.try_get("favorite_id")?,
            favorited_at: row.try_get("favorited_at")?,
            video: VideoRow::from_row(row)?,
        })
    }
}

impl From<FavoriteVideoRow> for FavoriteVideo {
    fn from(row: FavoriteVideoRow) -> Self {
        FavoriteVideo {
            favorite_id: FavoriteId::new(row.favorite_id),
            favorited_at: row.favorited_at,
            video: row.video.into(),
        }
    }
}
