use serde::{Deserialize, Serialize};

use crate::svclient::types::{PlaylistID, VideoID, Visibility};

/// Entries of `videos` are populated objects in listings, but bare IDs elsewhere
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlaylistVideoRef {
    Id(VideoID),
    Entry {
        #[serde(rename = "_id")]
        id: VideoID,
        #[serde(default)]
        thumbnail: Option<String>,
    },
}

impl PlaylistVideoRef {
    pub fn id(&self) -> &VideoID {
        match self {
            PlaylistVideoRef::Id(id) => id,
            PlaylistVideoRef::Entry { id, thumbnail: _ } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePlaylist {
    #[serde(rename = "_id")]
    pub id: PlaylistID,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub videos: Vec<PlaylistVideoRef>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of the playlist creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlaylist {
    pub title: String,
    pub description: String,
    pub visibility: Visibility,
}
