use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vidcat_core::{Entity, FavoriteId, VideoId};

use crate::video::Video;

/// A global "favorited" marker on a video. Deleting it leaves the video intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: FavoriteId,
    pub video_id: VideoId,
    pub created_at: DateTime<Utc>,
}

impl Entity for Favorite {
    type Id = FavoriteId;

    fn id(&self) -> FavoriteId {
        self.id
    }
}

/// One row of the "recently favorited" feed: the favorite joined with its video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteVideo {
    pub favorite_id: FavoriteId,
    pub favorited_at: DateTime<Utc>,
    pub video: Video,
}

impl FavoriteVideo {
    pub fn new(favorite: &Favorite, video: Video) -> Self {
        Self {
            favorite_id: favorite.id,
            favorited_at: favorite.created_at,
            video,
        }
    }
}
