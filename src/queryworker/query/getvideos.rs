use strum::Display;

use crate::svclient::response::video::RemoteVideo;

#[derive(Debug, Clone, PartialEq, Display)]
pub enum GetVideosResponse {
    Success(Vec<RemoteVideo>),
    /// The server wants a signed in user
    Unauthorized,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Display)]
pub enum WatchVideoResponse {
    /// Guests never like anything
    Success { video: RemoteVideo, is_liked: bool },
    NotAvailable,
    Failure(String),
}
