pub mod highlevelquery;
pub mod query;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use color_eyre::Result;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::action::Action;
use crate::config::Config;
use crate::queryworker::highlevelquery::HighLevelQuery;
use crate::queryworker::query::createplaylist::CreatePlaylistResponse;
use crate::queryworker::query::getvideos::{GetVideosResponse, WatchVideoResponse};
use crate::queryworker::query::search::SearchResponse;
use crate::queryworker::query::setmembership::SetMembershipResponse;
use crate::queryworker::query::{FromQueryWorker, ResponseType, ToQueryWorker};
use crate::statelib::membership::{Intent, MembershipKey, PendingToggle};
use crate::svclient::error::ClientError;
use crate::svclient::response::video::RemoteVideo;
use crate::svclient::types::VideoID;
use crate::svclient::SVClient;
use crate::trace_dbg;

pub struct QueryWorker {
    client: Arc<SVClient>,
    req_tx: UnboundedSender<ToQueryWorker>,
    req_rx: UnboundedReceiver<ToQueryWorker>,
    action_tx: UnboundedSender<Action>,
    /// Completion signal of the most recent membership request for each pair
    tails: HashMap<MembershipKey, oneshot::Receiver<()>>,
    token: CancellationToken,
}

static COUNTER: AtomicUsize = AtomicUsize::new(1);

impl QueryWorker {
    /// Returns a unique ticket number
    /// This value must be included in every request sent to this worker
    pub fn get_ticket() -> usize {
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn new(
        action_tx: UnboundedSender<Action>,
        config: &Config,
        token: CancellationToken,
    ) -> Result<Self> {
        let client = SVClient::new(
            &config.server.host,
            Duration::from_secs(config.server.request_timeout_secs),
        )?;
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        Ok(Self {
            client: Arc::new(client),
            req_tx,
            req_rx,
            action_tx,
            tails: HashMap::new(),
            token,
        })
    }

    pub fn get_tx(&self) -> UnboundedSender<ToQueryWorker> {
        self.req_tx.clone()
    }

    pub async fn run(&mut self) -> Result<()> {
        trace_dbg!("Starting QueryWorker...");
        loop {
            let event = tokio::select! {
                _ = self.token.cancelled() => break,
                event = self.req_rx.recv() => event,
            };
            let Some(event) = event else {
                break;
            };
            self.handle(event);
        }
        debug!("QueryWorker stopped");
        Ok(())
    }

    fn handle(&mut self, event: ToQueryWorker) {
        let ToQueryWorker {
            dest,
            ticket,
            query,
        } = event;
        let queued = match &query {
            HighLevelQuery::SetMembership(pending) => Some(self.enqueue(&pending.key)),
            _ => None,
        };
        let tx = self.action_tx.clone();
        let c = self.client.clone();
        tokio::spawn(async move {
            let done = match queued {
                Some((done, previous)) => {
                    if let Some(previous) = previous {
                        // An error only means the previous task is gone, so it is finished too
                        let _ = previous.await;
                    }
                    Some(done)
                }
                None => None,
            };
            let res = QueryWorker::run_query(&c, query).await;
            if let Some(done) = done {
                let _ = done.send(());
            }
            let _ = tx.send(Action::FromQueryWorker(FromQueryWorker::new(
                dest, ticket, res,
            )));
        });
    }

    /// Registers a new request for the pair. Returns the sender used to signal that the new
    /// request is done, together with the signal of the request it has to wait for.
    fn enqueue(
        &mut self,
        key: &MembershipKey,
    ) -> (oneshot::Sender<()>, Option<oneshot::Receiver<()>>) {
        // Drop signals of requests that already finished
        self.tails
            .retain(|_, rx| matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        let (done_tx, done_rx) = oneshot::channel();
        let previous = self.tails.insert(key.clone(), done_rx);
        (done_tx, previous)
    }

    async fn set_membership(c: &SVClient, pending: &PendingToggle) -> Result<(), ClientError> {
        let MembershipKey { playlist, video } = &pending.key;
        let res = match pending.intent {
            Intent::Add => c.add_video(video, playlist).await,
            Intent::Remove => c.remove_video(video, playlist).await,
        };
        if let Err(e) = &res {
            warn!(?pending, "Membership change failed: {e}");
        }
        res
    }

    async fn run_query(c: &SVClient, query: HighLevelQuery) -> ResponseType {
        match query {
            HighLevelQuery::ListPlaylists => {
                ResponseType::ListPlaylists(c.get_my_playlists().await.map_err(|e| e.to_string()))
            }
            HighLevelQuery::SetMembership(pending) => {
                let result = QueryWorker::set_membership(c, &pending).await;
                ResponseType::SetMembership(SetMembershipResponse {
                    pending,
                    result: result.map_err(|e| e.to_string()),
                })
            }
            HighLevelQuery::CreatePlaylist(params) => {
                let result = c
                    .create_playlist(&params.playlist)
                    .await
                    .map_err(|e| e.to_string());
                ResponseType::CreatePlaylist(CreatePlaylistResponse {
                    add_video: params.add_video,
                    result,
                })
            }
            HighLevelQuery::Login(params) => ResponseType::Login(
                c.login(&params.user_id, &params.password)
                    .await
                    .map_err(|e| e.to_string()),
            ),
            HighLevelQuery::Logout => {
                ResponseType::Logout(c.logout().await.map_err(|e| e.to_string()))
            }
            HighLevelQuery::CurrentUser => {
                ResponseType::CurrentUser(c.current_user().await.map_err(|e| e.to_string()))
            }
            HighLevelQuery::ListVideos => ResponseType::ListVideos(match c.get_videos().await {
                Ok(videos) => GetVideosResponse::Success(videos),
                Err(ClientError::Unauthorized) => GetVideosResponse::Unauthorized,
                Err(e) => GetVideosResponse::Failure(e.to_string()),
            }),
            HighLevelQuery::WatchVideo { video, signed_in } => {
                ResponseType::WatchVideo(QueryWorker::watch_video(c, &video, signed_in).await)
            }
            HighLevelQuery::ListSubscriptions => ResponseType::ListSubscriptions(
                c.get_subscriptions().await.map_err(|e| e.to_string()),
            ),
            HighLevelQuery::ToggleSubscribe(params) => {
                let result = c
                    .toggle_subscribe(&params.channel)
                    .await
                    .map_err(|e| e.to_string());
                ResponseType::ToggleSubscribe { params, result }
            }
            HighLevelQuery::Search(query) => {
                let (videos, channels) =
                    tokio::join!(c.search_videos(&query), c.search_channels(&query));
                ResponseType::Search(SearchResponse {
                    query,
                    videos: videos.map_err(|e| e.to_string()),
                    channels: channels.map_err(|e| e.to_string()),
                })
            }
            HighLevelQuery::LikedVideos => {
                ResponseType::LikedVideos(c.liked_videos().await.map_err(|e| e.to_string()))
            }
            HighLevelQuery::ToggleLike(params) => {
                let result = c.toggle_like(&params.video).await.map_err(|e| e.to_string());
                ResponseType::ToggleLike { params, result }
            }
        }
    }

    async fn watch_video(c: &SVClient, video: &VideoID, signed_in: bool) -> WatchVideoResponse {
        let found: Result<Option<RemoteVideo>, ClientError>;
        let mut is_liked = false;
        if signed_in {
            let (watched, engagement, history) = tokio::join!(
                c.watch_video(video, true),
                c.engagement(video),
                c.add_to_watch_history(video)
            );
            found = watched;
            match engagement {
                Ok(engagement) => is_liked = engagement.is_liked,
                Err(e) => warn!(%video, "Failed to fetch engagement: {e}"),
            }
            if let Err(e) = history {
                warn!(%video, "Failed to add to watch history: {e}");
            }
        } else {
            found = c.watch_video(video, false).await;
        }
        match found {
            Ok(Some(video)) => WatchVideoResponse::Success { video, is_liked },
            Ok(None) => WatchVideoResponse::NotAvailable,
            Err(e) => WatchVideoResponse::Failure(e.to_string()),
        }
    }
}
