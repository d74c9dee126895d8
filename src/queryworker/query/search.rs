use crate::svclient::response::{channel::RemoteChannel, video::RemoteVideo};

/// Videos and channels are looked up separately, so either half may fail on its own
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub videos: Result<Vec<RemoteVideo>, String>,
    pub channels: Result<Vec<RemoteChannel>, String>,
}
