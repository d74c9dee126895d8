pub mod error;
pub mod response;
pub mod types;

use std::time::Duration;

use error::ClientError;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use response::{
    apiresponse::ApiResponse,
    channel::{RemoteChannel, Subscribed},
    playlist::{NewPlaylist, RemotePlaylist},
    user::RemoteUser,
    video::{Engagement, LikedEntry, RemoteVideo},
};
use serde::{de::DeserializeOwned, de::IgnoredAny};
use serde_json::json;
use tracing::debug;
use types::{ChannelID, PlaylistID, VideoID};

/// HTTP client for the Stream Vault REST API.
///
/// Authentication is entirely cookie based: the session cookie handed out on login is kept in
/// the client's cookie store and sent along with every following request. No other header
/// carries credentials.
pub struct SVClient {
    http: Client,
    base: Url,
}

impl SVClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, ClientError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ClientError::InvalidUrl("Host cannot be empty".to_string()));
        }
        let base = Url::parse(host).map_err(|e| ClientError::InvalidUrl(format!("{host}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{host}: URL must start with http:// or https://"
            )));
        }
        let http = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .user_agent(format!("streamvault/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    pub fn host(&self) -> &Url {
        &self.base
    }

    /// Appends the segments to the configured host. Every segment is percent-encoded on its own,
    /// so IDs can never change the shape of the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> Result<ApiResponse<T>, ClientError> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;
        match serde_json::from_str::<ApiResponse<T>>(&body) {
            Ok(mut parsed) => {
                parsed.http_status = status.as_u16();
                Ok(parsed)
            }
            Err(_) if status == StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            Err(e) => Err(ClientError::Parse(format!("HTTP {}: {}", status.as_u16(), e))),
        }
    }

    fn expect_accepted<T>(res: &ApiResponse<T>, fallback: &str) -> Result<(), ClientError> {
        if res.accepted() {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or(fallback),
            })
        }
    }

    fn expect_success<T>(res: &ApiResponse<T>, fallback: &str) -> Result<(), ClientError> {
        if res.success {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or(fallback),
            })
        }
    }

    /// `POST /api/v1/playLists/addVideo/{video}/{playlist}`
    pub async fn add_video(
        &self,
        video: &VideoID,
        playlist: &PlaylistID,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playLists",
            "addVideo",
            video.as_str(),
            playlist.as_str(),
        ])?;
        debug!(%url, "Adding video to playlist");
        let res: ApiResponse<IgnoredAny> = self.send(self.http.post(url)).await?;
        Self::expect_accepted(&res, "Failed to add video to playlist")
    }

    /// `DELETE /api/v1/playLists/removeVideo/{video}/{playlist}`
    pub async fn remove_video(
        &self,
        video: &VideoID,
        playlist: &PlaylistID,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "playLists",
            "removeVideo",
            video.as_str(),
            playlist.as_str(),
        ])?;
        debug!(%url, "Removing video from playlist");
        let res: ApiResponse<IgnoredAny> = self.send(self.http.delete(url)).await?;
        Self::expect_accepted(&res, "Failed to remove video from playlist")
    }

    pub async fn get_my_playlists(&self) -> Result<Vec<RemotePlaylist>, ClientError> {
        let url = self.endpoint(&["api", "v1", "playLists", "getMyPlayList"])?;
        let mut res: ApiResponse<Vec<RemotePlaylist>> = self.send(self.http.get(url)).await?;
        Self::data_or_rejected(&mut res, "No playlists in response")
    }

    pub async fn create_playlist(
        &self,
        playlist: &NewPlaylist,
    ) -> Result<RemotePlaylist, ClientError> {
        let url = self.endpoint(&["api", "v1", "playLists", "createPlayList"])?;
        let mut res: ApiResponse<RemotePlaylist> =
            self.send(self.http.post(url).json(playlist)).await?;
        let created = matches!(res.status_code, Some(200) | Some(201)) || res.success;
        match res.data.take() {
            Some(remote) if created => Ok(remote),
            _ => Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or("Failed to create playlist"),
            }),
        }
    }

    pub async fn login(&self, user_id: &str, password: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "login"])?;
        let body = json!({ "userId": user_id, "password": password });
        let res: ApiResponse<IgnoredAny> = self.send(self.http.post(url).json(&body)).await?;
        Self::expect_accepted(&res, "Login failed")
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "logout"])?;
        let res: ApiResponse<IgnoredAny> = self.send(self.http.get(url)).await?;
        Self::expect_accepted(&res, "Logout failed")
    }

    /// Returns `None` if the server does not recognise the session
    pub async fn current_user(&self) -> Result<Option<RemoteUser>, ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "getCurrentUser"])?;
        match self.send::<RemoteUser>(self.http.get(url)).await {
            Ok(mut res) if res.success => Ok(res.data.take()),
            Ok(_) | Err(ClientError::Unauthorized) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn get_videos(&self) -> Result<Vec<RemoteVideo>, ClientError> {
        let url = self.endpoint(&["api", "v1", "videos", ""])?;
        let mut res: ApiResponse<Vec<RemoteVideo>> = self.send(self.http.get(url)).await?;
        if res.http_status == StatusCode::UNAUTHORIZED.as_u16() {
            return Err(ClientError::Unauthorized);
        }
        Self::expect_accepted(&res, "Failed to fetch videos")?;
        Ok(res.data.take().unwrap_or_default())
    }

    /// Signed in users and guests use different endpoints. Returns `None` if the video is not
    /// available.
    pub async fn watch_video(
        &self,
        video: &VideoID,
        signed_in: bool,
    ) -> Result<Option<RemoteVideo>, ClientError> {
        let route = if signed_in {
            "watchVideo"
        } else {
            "watchVideoUnknownUser"
        };
        let url = self.endpoint(&["api", "v1", "videos", route, video.as_str()])?;
        let mut res: ApiResponse<RemoteVideo> = self.send(self.http.get(url)).await?;
        if res.success {
            Ok(res.data.take())
        } else {
            Ok(None)
        }
    }

    pub async fn get_subscriptions(&self) -> Result<Vec<RemoteChannel>, ClientError> {
        let url = self.endpoint(&["api", "v1", "subscriptions", "getMySubscribed"])?;
        let mut res: ApiResponse<Subscribed> = self.send(self.http.get(url)).await?;
        Self::expect_success(&res, "Failed to fetch subscriptions")?;
        Ok(res.data.take().map(|s| s.subscribeds).unwrap_or_default())
    }

    /// `PATCH /api/v1/subscriptions/toggleSubscribe/{channel}`
    pub async fn toggle_subscribe(&self, channel: &ChannelID) -> Result<(), ClientError> {
        let url = self.endpoint(&[
            "api",
            "v1",
            "subscriptions",
            "toggleSubscribe",
            channel.as_str(),
        ])?;
        let res: ApiResponse<IgnoredAny> = self.send(self.http.patch(url)).await?;
        Self::expect_success(&res, "Failed to update subscription")
    }

    fn data_or_rejected<T>(res: &mut ApiResponse<T>, fallback: &str) -> Result<T, ClientError> {
        match res.data.take() {
            Some(data) => Ok(data),
            None => Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or(fallback),
            }),
        }
    }

    /// The endpoint name is misspelled on the server
    pub async fn search_videos(&self, query: &str) -> Result<Vec<RemoteVideo>, ClientError> {
        let url = self.endpoint(&["api", "v1", "videos", "getSeachVideos", query])?;
        debug!(%url, "Searching videos");
        let mut res: ApiResponse<Vec<RemoteVideo>> = self.send(self.http.get(url)).await?;
        Self::data_or_rejected(&mut res, "No videos in response")
    }

    pub async fn search_channels(&self, query: &str) -> Result<Vec<RemoteChannel>, ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "searchChannel", query])?;
        debug!(%url, "Searching channels");
        let mut res: ApiResponse<Vec<RemoteChannel>> = self.send(self.http.get(url)).await?;
        Self::data_or_rejected(&mut res, "No channels in response")
    }

    pub async fn liked_videos(&self) -> Result<Vec<RemoteVideo>, ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "getLikedVideos"])?;
        let mut res: ApiResponse<Vec<LikedEntry>> = self.send(self.http.get(url)).await?;
        Self::expect_accepted(&res, "Failed to fetch liked videos")?;
        Ok(res
            .data
            .take()
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.videos)
            .collect())
    }

    /// Anything but an accepted answer reads as no engagement at all
    pub async fn engagement(&self, video: &VideoID) -> Result<Engagement, ClientError> {
        let url = self.endpoint(&["api", "v1", "videos", "userEngagement", video.as_str()])?;
        let mut res: ApiResponse<Engagement> = self.send(self.http.get(url)).await?;
        if res.accepted() {
            Ok(res.data.take().unwrap_or_default())
        } else {
            Ok(Engagement::default())
        }
    }

    /// `POST /api/v1/likes/video/{video}` flips the like on the server
    pub async fn toggle_like(&self, video: &VideoID) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "v1", "likes", "video", video.as_str()])?;
        debug!(%url, "Toggling like");
        let res: ApiResponse<IgnoredAny> = self.send(self.http.post(url)).await?;
        if res.accepted() || res.success {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or("Failed to update like"),
            })
        }
    }

    pub async fn add_to_watch_history(&self, video: &VideoID) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "v1", "users", "addToWatchHistory", video.as_str()])?;
        let res: ApiResponse<IgnoredAny> = self.send(self.http.post(url)).await?;
        if res.accepted() || res.success {
            Ok(())
        } else {
            Err(ClientError::Rejected {
                status: res.reported_status(),
                message: res.message_or("Failed to record watch history"),
            })
        }
    }
}
