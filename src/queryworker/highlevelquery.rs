use strum::Display;

use crate::{
    compid::CompID,
    queryworker::query::{
        createplaylist::CreatePlaylistParams, login::LoginParams, togglelike::ToggleLikeParams,
        togglesubscribe::ToggleSubscribeParams,
    },
    statelib::membership::PendingToggle,
    svclient::types::VideoID,
};

/// [`HighLevelQuery`] wraps one or more HTTP requests. The variants follow what the user is trying
/// to do rather than the endpoints, so each of them knows which component the response goes to
/// and how the response should be interpreted.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum HighLevelQuery {
    /// Fetches every playlist owned by the signed in user
    ListPlaylists,
    /// Adds a video to or removes it from a playlist. Requests for the same playlist and video are
    /// sent one at a time, in the order they were received.
    SetMembership(PendingToggle),
    /// Creates a playlist, and optionally adds a video to it right after
    CreatePlaylist(CreatePlaylistParams),
    Login(LoginParams),
    Logout,
    /// Checks who the session cookie belongs to
    CurrentUser,
    ListVideos,
    /// Signed in users also get their like state, and the video lands in their watch history
    WatchVideo { video: VideoID, signed_in: bool },
    ListSubscriptions,
    ToggleSubscribe(ToggleSubscribeParams),
    /// Looks for videos and channels matching the words
    Search(String),
    LikedVideos,
    ToggleLike(ToggleLikeParams),
}

impl HighLevelQuery {
    pub fn get_dest(&self) -> CompID {
        match self {
            HighLevelQuery::ListPlaylists
            | HighLevelQuery::SetMembership(_)
            | HighLevelQuery::CreatePlaylist(_) => CompID::PlaylistPicker,
            HighLevelQuery::Login(_) | HighLevelQuery::Logout | HighLevelQuery::CurrentUser => {
                CompID::Home
            }
            HighLevelQuery::ListVideos
            | HighLevelQuery::WatchVideo { .. }
            | HighLevelQuery::ToggleLike(_) => CompID::Feed,
            HighLevelQuery::ListSubscriptions | HighLevelQuery::ToggleSubscribe(_) => {
                CompID::Subscriptions
            }
            HighLevelQuery::Search(_) => CompID::Search,
            HighLevelQuery::LikedVideos => CompID::Liked,
        }
    }
}
