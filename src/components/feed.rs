use chrono::Utc;
use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use tracing::{debug, info};

use crate::{
    action::{localaction::ListAction, useraction::UserAction, Action},
    compid::CompID,
    components::{
        lib::videotable::{VideoCard, VideoTable},
        notifier::Notification,
        traits::{
            handlekeyseq::{HandleKeySeq, KeySeqResult},
            handlequery::HandleQuery,
            handlesession::HandleSession,
            renderable::Renderable,
        },
    },
    config::keybindings::KeyBindings,
    queryworker::{
        highlevelquery::HighLevelQuery,
        query::{
            getvideos::{GetVideosResponse, WatchVideoResponse},
            togglelike::ToggleLikeParams,
            ResponseType, ToQueryWorker,
        },
    },
    session::UserSession,
    svclient::types::VideoID,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchView {
    pub card: VideoCard,
    pub description: String,
    pub likes: u64,
    pub is_liked: bool,
}

/// Like state from before the latest optimistic like toggle
struct LikeSnapshot {
    video: VideoID,
    generation: u64,
    is_liked: bool,
    likes: u64,
}

enum View {
    Feed,
    Watch(WatchView),
    NotAvailable,
}

/// Recent videos, and the video being watched
pub struct Feed {
    session: Option<UserSession>,
    table: VideoTable,
    view: View,
    generation: u64,
    like_snapshot: Option<LikeSnapshot>,
    binds: KeyBindings<ListAction>,
}

impl Feed {
    pub fn new(session: Option<UserSession>, binds: KeyBindings<ListAction>) -> Self {
        Self {
            session,
            table: VideoTable::new("Latest videos"),
            view: View::Feed,
            generation: 0,
            like_snapshot: None,
            binds,
        }
    }

    pub fn cards(&self) -> &[VideoCard] {
        self.table.cards()
    }

    pub fn watching(&self) -> Option<&WatchView> {
        match &self.view {
            View::Watch(w) => Some(w),
            _ => None,
        }
    }

    pub fn list(&mut self) -> Action {
        self.view = View::Feed;
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::ListVideos))
    }

    /// Guests and signed in users are served by different endpoints
    pub fn watch(&mut self, video: VideoID) -> Action {
        let signed_in = self.session.is_some();
        info!(%video, signed_in, "Opening video");
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::WatchVideo {
            video,
            signed_in,
        }))
    }

    /// Flips the like on the video being watched right away. The server is told afterwards, and
    /// the flip is rolled back if it refuses.
    pub fn like(&mut self) -> Action {
        if self.session.is_none() {
            return Action::Notify(Notification::error("Sign in to like videos"));
        }
        let View::Watch(watch) = &mut self.view else {
            return Action::Notify(Notification::error("Open a video first"));
        };
        self.generation += 1;
        self.like_snapshot = Some(LikeSnapshot {
            video: watch.card.id.clone(),
            generation: self.generation,
            is_liked: watch.is_liked,
            likes: watch.likes,
        });
        if watch.is_liked {
            watch.likes = watch.likes.saturating_sub(1);
        } else {
            watch.likes += 1;
        }
        watch.is_liked = !watch.is_liked;
        debug!(video = %watch.card.id, liked = watch.is_liked, "Toggling like");
        Action::Multiple(vec![
            Action::Render,
            Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::ToggleLike(
                ToggleLikeParams {
                    video: watch.card.id.clone(),
                    generation: self.generation,
                },
            ))),
        ])
    }

    fn on_like(&mut self, params: ToggleLikeParams, result: Result<(), String>) -> Option<Action> {
        let latest = self
            .like_snapshot
            .as_ref()
            .is_some_and(|s| s.generation == params.generation && s.video == params.video);
        if !latest {
            debug!(?params, "Discarding superseded like response");
            return None;
        }
        let snapshot = self.like_snapshot.take()?;
        let watch = match &mut self.view {
            View::Watch(w) if w.card.id == snapshot.video => Some(w),
            _ => None,
        };
        match result {
            Ok(()) => Some(Action::Notify(Notification::info(
                match watch.map(|w| w.is_liked) {
                    Some(false) => "Removed from liked videos",
                    _ => "Added to liked videos",
                },
            ))),
            Err(e) => {
                if let Some(watch) = watch {
                    watch.is_liked = snapshot.is_liked;
                    watch.likes = snapshot.likes;
                }
                Some(Action::Multiple(vec![
                    Action::Render,
                    Action::Notify(Notification::error(format!("Failed to update like: {e}"))),
                ]))
            }
        }
    }
}

impl HandleQuery for Feed {
    fn handle_query(&mut self, dest: CompID, _ticket: usize, res: ResponseType) -> Option<Action> {
        if dest != CompID::Feed {
            return None;
        }
        match res {
            ResponseType::ListVideos(res) => {
                self.view = View::Feed;
                match res {
                    GetVideosResponse::Success(videos) => {
                        self.table.set_videos(&videos);
                        Some(Action::Render)
                    }
                    GetVideosResponse::Unauthorized => {
                        self.table.clear();
                        Some(Action::Notify(Notification::error(
                            "Sign in to see the latest videos",
                        )))
                    }
                    GetVideosResponse::Failure(e) => {
                        self.table.clear();
                        Some(Action::Multiple(vec![
                            Action::Render,
                            Action::Notify(Notification::error(format!(
                                "Failed to load videos: {e}"
                            ))),
                        ]))
                    }
                }
            }
            ResponseType::WatchVideo(res) => match res {
                WatchVideoResponse::Success { video, is_liked } => {
                    self.like_snapshot = None;
                    self.view = View::Watch(WatchView {
                        card: VideoCard::new(&video, Utc::now()),
                        description: video.description,
                        likes: video.likes,
                        is_liked,
                    });
                    Some(Action::Render)
                }
                WatchVideoResponse::NotAvailable => {
                    self.view = View::NotAvailable;
                    Some(Action::Render)
                }
                WatchVideoResponse::Failure(e) => Some(Action::Notify(Notification::error(
                    format!("Failed to load video: {e}"),
                ))),
            },
            ResponseType::ToggleLike { params, result } => self.on_like(params, result),
            _ => None,
        }
    }
}

impl HandleSession for Feed {
    fn set_session(&mut self, session: Option<UserSession>) {
        self.session = session;
    }
}

impl Renderable for Feed {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        match &self.view {
            View::Feed => self.table.draw(frame, area),
            View::Watch(w) => {
                let liked = if w.is_liked {
                    Span::raw("Liked").fg(Color::Green)
                } else {
                    Span::raw("Not liked").dim()
                };
                let lines = vec![
                    Line::raw(w.card.title.clone()).bold(),
                    Line::raw(format!(
                        "{} | {} views | {} likes | {} | {}",
                        w.card.channel, w.card.views, w.likes, w.card.duration, w.card.time
                    )),
                    Line::from(liked),
                    Line::default(),
                    Line::raw(w.description.clone()),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .wrap(Wrap { trim: false })
                        .block(Block::bordered().title(format!("Watching {}", w.card.id))),
                    area,
                );
            }
            View::NotAvailable => frame.render_widget(
                Paragraph::new("NOT Available")
                    .centered()
                    .style(Style::new().fg(Color::Red))
                    .block(Block::bordered()),
                area,
            ),
        }
    }
}

impl HandleKeySeq<ListAction> for Feed {
    fn handle_local_action(&mut self, action: ListAction) -> KeySeqResult {
        if matches!(self.view, View::Feed) {
            if self.table.navigate(action) {
                return KeySeqResult::ActionNeeded(Action::Render);
            }
            let Some(card) = self.table.selected() else {
                return KeySeqResult::NoActionNeeded;
            };
            let video = card.id.to_string();
            return match action {
                ListAction::Confirm => {
                    KeySeqResult::ActionNeeded(Action::User(UserAction::Watch { video }))
                }
                ListAction::Pick => {
                    KeySeqResult::ActionNeeded(Action::User(UserAction::Pick { video }))
                }
                _ => KeySeqResult::NoActionNeeded,
            };
        }
        let watched = self.watching().map(|w| w.card.id.to_string());
        match (action, watched) {
            (ListAction::Pick, Some(video)) => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Pick { video }))
            }
            (ListAction::Like, Some(_)) => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Like))
            }
            (ListAction::Back, _) => {
                self.view = View::Feed;
                KeySeqResult::ActionNeeded(Action::Render)
            }
            _ => KeySeqResult::NoActionNeeded,
        }
    }

    fn get_keybinds(&self) -> &KeyBindings<ListAction> {
        &self.binds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{keyparser::KeyParser, Config};
    use crate::helper::testrender::{render, shows};
    use crate::svclient::{
        response::{user::Owner, video::RemoteVideo},
        types::UserID,
    };
    use pretty_assertions::assert_eq;

    fn video() -> RemoteVideo {
        RemoteVideo {
            id: VideoID::from("v1"),
            title: "Cats".to_string(),
            description: "Many cats".to_string(),
            owner: Owner {
                user_name: "bob".to_string(),
                avatar: None,
            },
            views: 1500,
            likes: 3,
            duration: 125.7,
            thumbnail: None,
            video_file: None,
            created_at: None,
        }
    }

    fn session() -> UserSession {
        UserSession {
            id: UserID("u1".to_string()),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            subscribers_count: 0,
            subscribed_count: 0,
        }
    }

    fn feed(session: Option<UserSession>) -> Feed {
        Feed::new(session, Config::preset().local.list)
    }

    fn watching(is_liked: bool) -> Feed {
        let mut feed = feed(Some(session()));
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::WatchVideo(WatchVideoResponse::Success {
                video: video(),
                is_liked,
            }),
        );
        feed
    }

    fn sent_like(action: Action) -> ToggleLikeParams {
        let Action::Multiple(actions) = action else {
            panic!("Expected multiple actions");
        };
        actions
            .into_iter()
            .find_map(|a| match a {
                Action::ToQueryWorker(ToQueryWorker {
                    query: HighLevelQuery::ToggleLike(params),
                    ..
                }) => Some(params),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn card_formats_fields() {
        let card = VideoCard::new(&video(), Utc::now());
        assert_eq!(card.views, "1.5k");
        assert_eq!(card.duration, "2:05");
        assert_eq!(card.channel, "bob");
        assert_eq!(card.time, "");
    }

    #[test]
    fn watch_endpoint_follows_session() {
        let mut feed = feed(None);
        let guest = feed.watch(VideoID::from("v1"));
        assert!(matches!(
            guest,
            Action::ToQueryWorker(ToQueryWorker {
                query: HighLevelQuery::WatchVideo {
                    signed_in: false,
                    ..
                },
                ..
            })
        ));
    }

    #[test]
    fn unavailable_video_placeholder() {
        let mut feed = feed(None);
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::WatchVideo(WatchVideoResponse::NotAvailable),
        );
        assert!(shows(&render(&mut feed, 40, 5), "NOT Available"));
    }

    #[test]
    fn unauthorized_feed_is_empty() {
        let mut feed = feed(None);
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ListVideos(GetVideosResponse::Success(vec![video()])),
        );
        assert_eq!(feed.cards().len(), 1);
        let res = feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ListVideos(GetVideosResponse::Unauthorized),
        );
        assert!(matches!(res, Some(Action::Notify(_))));
        assert!(feed.cards().is_empty());
    }

    #[test]
    fn keys_open_and_pick() {
        let mut feed = feed(None);
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ListVideos(GetVideosResponse::Success(vec![video()])),
        );
        let rows = render(&mut feed, 80, 5);
        assert!(shows(&rows, ">Cats"));
        assert_eq!(
            feed.handle_key_seq(&KeyParser::parse_key_sequence("<enter>").unwrap()),
            Some(KeySeqResult::ActionNeeded(Action::User(UserAction::Watch {
                video: "v1".to_string()
            })))
        );
        assert_eq!(
            feed.handle_key_seq(&KeyParser::parse_key_sequence("<a>").unwrap()),
            Some(KeySeqResult::ActionNeeded(Action::User(UserAction::Pick {
                video: "v1".to_string()
            })))
        );
    }

    #[test]
    fn like_shows_right_away() {
        let mut feed = watching(false);
        let params = sent_like(feed.like());
        let watch = feed.watching().unwrap();
        assert!(watch.is_liked);
        assert_eq!(watch.likes, 4);
        let res = feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ToggleLike {
                params,
                result: Ok(()),
            },
        );
        assert!(matches!(res, Some(Action::Notify(ref n)) if n.message == "Added to liked videos"));
        assert!(feed.watching().unwrap().is_liked);
    }

    #[test]
    fn refused_like_rolls_back() {
        let mut feed = watching(true);
        let params = sent_like(feed.like());
        assert!(!feed.watching().unwrap().is_liked);
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ToggleLike {
                params,
                result: Err("HTTP 500".to_string()),
            },
        );
        let watch = feed.watching().unwrap();
        assert!(watch.is_liked);
        assert_eq!(watch.likes, 3);
        assert!(shows(&render(&mut feed, 60, 8), "Liked"));
    }

    #[test]
    fn superseded_like_response_is_ignored() {
        let mut feed = watching(false);
        let first = sent_like(feed.like());
        let second = sent_like(feed.like());
        let res = feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ToggleLike {
                params: first,
                result: Err("HTTP 500".to_string()),
            },
        );
        assert!(res.is_none());
        assert!(!feed.watching().unwrap().is_liked);
        feed.handle_query(
            CompID::Feed,
            0,
            ResponseType::ToggleLike {
                params: second,
                result: Err("HTTP 500".to_string()),
            },
        );
        // Back to the state after the first toggle
        assert!(feed.watching().unwrap().is_liked);
    }

    #[test]
    fn guests_cannot_like() {
        let mut feed = feed(None);
        assert!(matches!(feed.like(), Action::Notify(_)));
    }
}
