//! In-memory catalog store for tests/dev.
//!
//! Mirrors the Postgres semantics (ordering, tie-breaks, referential checks)
//! so the HTTP surface behaves the same against either backend.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use vidcat_catalog::{
    Comment, Favorite, FavoriteVideo, NewComment, NewVideo, Page, SearchQuery, Video,
};
use vidcat_core::{CommentId, Entity, FavoriteId, VideoId};

use super::{CatalogSession, CatalogStore, StoreError};

/// Rows keyed by id plus a serial counter, like a `BIGSERIAL` table.
#[derive(Debug)]
struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    last_id: i64,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Entity + Clone> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn insert(&mut self, row: T) -> T {
        self.rows.insert(row.id(), row.clone());
        row
    }

    fn get(&self, id: T::Id) -> Option<&T> {
        self.rows.get(&id)
    }

    fn get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    fn remove(&mut self, id: T::Id) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Rows in primary-key order.
    fn scan(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    videos: Table<Video>,
    comments: Table<Comment>,
    favorites: Table<Favorite>,
}

/// Shared in-memory catalog. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    fn kind(&self) -> &'static str {
        "in-memory"
    }

    async fn session(&self) -> Result<Box<dyn CatalogSession>, StoreError> {
        Ok(Box::new(InMemorySession {
            state: self.state.clone(),
        }))
    }
}

/// Session over the shared state; the lock is taken per operation.
#[derive(Debug)]
pub struct InMemorySession {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemorySession {
    fn read(&self) -> Result<RwLockReadGuard<'_, CatalogState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CatalogState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CatalogSession for InMemorySession {
    async fn ping(&mut self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn create_video(&mut self, video: &NewVideo) -> Result<Video, StoreError> {
        let mut state = self.write()?;
        let id = VideoId::new(state.videos.next_id());
        Ok(state.videos.insert(video.clone().into_video(id, Utc::now())))
    }

    async fn get_video(&mut self, id: VideoId) -> Result<Option<Video>, StoreError> {
        Ok(self.read()?.videos.get(id).cloned())
    }

    async fn list_videos(&mut self, page: Page) -> Result<Vec<Video>, StoreError> {
        let state = self.read()?;
        let ordered: Vec<Video> = state.videos.scan().cloned().collect();
        Ok(page.slice(&ordered))
    }

    async fn create_comment(
        &mut self,
        video_id: VideoId,
        comment: &NewComment,
    ) -> Result<Comment, StoreError> {
        let mut state = self.write()?;
        if state.videos.get(video_id).is_none() {
            return Err(StoreError::VideoNotFound(video_id));
        }
        let id = CommentId::new(state.comments.next_id());
        Ok(state
            .comments
            .insert(comment.clone().into_comment(id, video_id, Utc::now())))
    }

    async fn list_comments(&mut self, video_id: VideoId) -> Result<Option<Vec<Comment>>, StoreError> {
        let state = self.read()?;
        if state.videos.get(video_id).is_none() {
            return Ok(None);
        }
        Ok(Some(
            state
                .comments
                .scan()
                .filter(|c| c.video_id == video_id)
                .cloned()
                .collect(),
        ))
    }

    async fn create_favorite(&mut self, video_id: VideoId) -> Result<Favorite, StoreError> {
        let mut state = self.write()?;
        if state.videos.get(video_id).is_none() {
            return Err(StoreError::VideoNotFound(video_id));
        }
        let id = FavoriteId::new(state.favorites.next_id());
        Ok(state.favorites.insert(Favorite {
            id,
            video_id,
            created_at: Utc::now(),
        }))
    }

    async fn delete_favorite(&mut self, id: FavoriteId) -> Result<Option<Favorite>, StoreError> {
        Ok(self.write()?.favorites.remove(id))
    }

    async fn top_videos_by_views(&mut self, limit: i64) -> Result<Vec<Video>, StoreError> {
        let state = self.read()?;
        let mut videos: Vec<Video> = state.videos.scan().cloned().collect();
        videos.sort_by(|a, b| b.views.cmp(&a.views).then(a.id.cmp(&b.id)));
        videos.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(videos)
    }

    async fn recent_favorite_videos(&mut self, limit: i64) -> Result<Vec<FavoriteVideo>, StoreError> {
        let state = self.read()?;
        let mut favorites: Vec<&Favorite> = state.favorites.scan().collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(favorites
            .into_iter()
            .filter_map(|f| {
                state
                    .videos
                    .get(f.video_id)
                    .map(|v| FavoriteVideo::new(f, v.clone()))
            })
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn search_videos(
        &mut self,
        query: &SearchQuery,
        limit: i64,
    ) -> Result<Vec<Video>, StoreError> {
        let state = self.read()?;
        Ok(state
            .videos
            .scan()
            .filter(|v| query.matches(v))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn increment_video_views(&mut self, id: VideoId) -> Result<Option<Video>, StoreError> {
        let mut state = self.write()?;
        Ok(state.videos.get_mut(id).map(|v| {
            v.views += 1;
            v.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidcat_catalog::TOP_LIMIT;

    fn new_video(title: &str) -> NewVideo {
        NewVideo::new(title, format!("https://cdn.example/{title}"), None::<&str>).unwrap()
    }

    async fn session() -> Box<dyn CatalogSession> {
        InMemoryCatalogStore::new().session().await.unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_identical_video() {
        let mut s = session().await;
        let created = s.create_video(&new_video("A")).await.unwrap();

        assert_eq!(created.id, VideoId::new(1));
        assert_eq!(created.views, 0);

        let fetched = s.get_video(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(s.get_video(VideoId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sessions_share_state() {
        let store = InMemoryCatalogStore::new();
        let created = {
            let mut s = store.session().await.unwrap();
            s.create_video(&new_video("A")).await.unwrap()
        };

        let mut other = store.session().await.unwrap();
        assert!(other.get_video(created.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn list_videos_is_paginated_in_id_order() {
        let mut s = session().await;
        for i in 0..5 {
            s.create_video(&new_video(&format!("v{i}"))).await.unwrap();
        }

        let first = s.list_videos(Page::new(Some(0), Some(2)).unwrap()).await.unwrap();
        let second = s.list_videos(Page::new(Some(2), Some(2)).unwrap()).await.unwrap();
        let past_end = s.list_videos(Page::new(Some(10), Some(2)).unwrap()).await.unwrap();

        let ids = |v: &[Video]| v.iter().map(|v| v.id.get()).collect::<Vec<_>>();
        assert_eq!(ids(&first), vec![1, 2]);
        assert_eq!(ids(&second), vec![3, 4]);
        assert!(past_end.is_empty());
    }

    #[tokio::test]
    async fn comments_require_existing_video() {
        let mut s = session().await;
        let comment = NewComment::new("hello").unwrap();

        let err = s.create_comment(VideoId::new(7), &comment).await.unwrap_err();
        assert!(matches!(err, StoreError::VideoNotFound(id) if id == VideoId::new(7)));

        let video = s.create_video(&new_video("A")).await.unwrap();
        let created = s.create_comment(video.id, &comment).await.unwrap();
        assert_eq!(created.video_id, video.id);
        assert_eq!(created.content, "hello");

        let listed = s.list_comments(video.id).await.unwrap().unwrap();
        assert_eq!(listed, vec![created]);
        assert!(s.list_comments(VideoId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn increment_counts_exactly() {
        let mut s = session().await;
        let video = s.create_video(&new_video("A")).await.unwrap();

        for _ in 0..3 {
            s.increment_video_views(video.id).await.unwrap();
        }

        assert_eq!(s.get_video(video.id).await.unwrap().unwrap().views, 3);
        assert!(s.increment_video_views(VideoId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn top_by_views_sorts_descending_with_id_tiebreak() {
        let mut s = session().await;
        let mut ids = Vec::new();
        for (title, views) in [("a", 3), ("b", 5), ("c", 1), ("d", 5)] {
            let v = s.create_video(&new_video(title)).await.unwrap();
            for _ in 0..views {
                s.increment_video_views(v.id).await.unwrap();
            }
            ids.push(v.id);
        }

        let top = s.top_videos_by_views(TOP_LIMIT).await.unwrap();
        let order: Vec<(VideoId, i64)> = top.iter().map(|v| (v.id, v.views)).collect();
        assert_eq!(
            order,
            vec![(ids[1], 5), (ids[3], 5), (ids[0], 3), (ids[2], 1)]
        );
    }

    #[tokio::test]
    async fn top_by_views_is_capped() {
        let mut s = session().await;
        for i in 0..15 {
            s.create_video(&new_video(&format!("v{i}"))).await.unwrap();
        }
        assert_eq!(s.top_videos_by_views(TOP_LIMIT).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn delete_favorite_is_idempotent_on_absence() {
        let mut s = session().await;
        let video = s.create_video(&new_video("A")).await.unwrap();
        let fav = s.create_favorite(video.id).await.unwrap();

        assert_eq!(s.delete_favorite(fav.id).await.unwrap(), Some(fav.clone()));
        assert!(s.delete_favorite(fav.id).await.unwrap().is_none());

        // The video is untouched.
        assert!(s.get_video(video.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn favorite_requires_existing_video() {
        let mut s = session().await;
        let err = s.create_favorite(VideoId::new(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::VideoNotFound(_)));
    }

    #[tokio::test]
    async fn recent_favorites_newest_first() {
        let mut s = session().await;
        let a = s.create_video(&new_video("a")).await.unwrap();
        let b = s.create_video(&new_video("b")).await.unwrap();

        let f1 = s.create_favorite(a.id).await.unwrap();
        let f2 = s.create_favorite(b.id).await.unwrap();
        let f3 = s.create_favorite(a.id).await.unwrap();
        s.delete_favorite(f2.id).await.unwrap();

        let recent = s.recent_favorite_videos(TOP_LIMIT).await.unwrap();
        let order: Vec<(FavoriteId, VideoId)> =
            recent.iter().map(|r| (r.favorite_id, r.video.id)).collect();
        assert_eq!(order, vec![(f3.id, a.id), (f1.id, a.id)]);
    }

    #[tokio::test]
    async fn search_matches_title_or_description_case_insensitively() {
        let mut s = session().await;
        s.create_video(&new_video("Funny Cats")).await.unwrap();
        s.create_video(&NewVideo::new("Dogs", "http://d", Some("not a cat video")).unwrap())
            .await
            .unwrap();
        s.create_video(&new_video("Birds")).await.unwrap();

        let hits = s
            .search_videos(&SearchQuery::new("CAT").unwrap(), 100)
            .await
            .unwrap();
        let titles: Vec<&str> = hits.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["Funny Cats", "Dogs"]);
    }
}
