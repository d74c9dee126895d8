pub mod createplaylist;
pub mod getvideos;
pub mod login;
pub mod search;
pub mod setmembership;
pub mod togglelike;
pub mod togglesubscribe;

use strum::Display;

use crate::{
    compid::CompID,
    queryworker::{
        highlevelquery::HighLevelQuery,
        query::{
            createplaylist::CreatePlaylistResponse,
            getvideos::{GetVideosResponse, WatchVideoResponse},
            search::SearchResponse,
            setmembership::SetMembershipResponse,
            togglelike::ToggleLikeParams,
            togglesubscribe::ToggleSubscribeParams,
        },
        QueryWorker,
    },
    svclient::response::{
        channel::RemoteChannel, playlist::RemotePlaylist, user::RemoteUser, video::RemoteVideo,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct ToQueryWorker {
    pub dest: CompID,
    pub ticket: usize,
    pub query: HighLevelQuery,
}

impl ToQueryWorker {
    /// Creates a request with a fresh ticket, addressed to the component that handles the
    /// response of this kind of query
    pub fn new(query: HighLevelQuery) -> Self {
        Self {
            dest: query.get_dest(),
            ticket: QueryWorker::get_ticket(),
            query,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromQueryWorker {
    pub dest: CompID,
    pub ticket: usize,
    pub res: ResponseType,
}

impl FromQueryWorker {
    pub fn new(dest: CompID, ticket: usize, res: ResponseType) -> Self {
        Self { dest, ticket, res }
    }
}

/// Errors are carried as strings so that responses can be cloned and compared like every other
/// [`Action`](crate::action::Action)
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ResponseType {
    ListPlaylists(Result<Vec<RemotePlaylist>, String>),
    SetMembership(SetMembershipResponse),
    CreatePlaylist(CreatePlaylistResponse),
    Login(Result<(), String>),
    Logout(Result<(), String>),
    CurrentUser(Result<Option<RemoteUser>, String>),
    ListVideos(GetVideosResponse),
    WatchVideo(WatchVideoResponse),
    ListSubscriptions(Result<Vec<RemoteChannel>, String>),
    ToggleSubscribe {
        params: ToggleSubscribeParams,
        result: Result<(), String>,
    },
    Search(SearchResponse),
    LikedVideos(Result<Vec<RemoteVideo>, String>),
    ToggleLike {
        params: ToggleLikeParams,
        result: Result<(), String>,
    },
}
