use serde::Deserialize;

use crate::svclient::{response::user::Owner, types::VideoID};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVideo {
    #[serde(rename = "_id")]
    pub id: VideoID,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub owner: Owner,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    /// Length in seconds
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub video_file: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Liked videos come wrapped in the like record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LikedEntry {
    pub videos: RemoteVideo,
}

/// What the signed in user did with a video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_subscribed: bool,
}
