use crate::svclient::{
    response::playlist::{NewPlaylist, RemotePlaylist},
    types::VideoID,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlaylistParams {
    pub playlist: NewPlaylist,
    /// Video to put into the playlist once it exists
    pub add_video: Option<VideoID>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePlaylistResponse {
    pub add_video: Option<VideoID>,
    pub result: Result<RemotePlaylist, String>,
}
