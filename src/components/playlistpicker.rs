use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, List, ListState, Paragraph},
    Frame,
};
use tracing::{debug, info};

use crate::{
    action::{localaction::ListAction, useraction::UserAction, Action},
    compid::CompID,
    components::{
        lib::cursor,
        notifier::{Notification, UndoAction},
        traits::{
            handlekeyseq::{HandleKeySeq, KeySeqResult},
            handlequery::HandleQuery,
            handlesession::HandleSession,
            renderable::Renderable,
        },
    },
    config::{behaviourconfig::BehaviourConfig, keybindings::KeyBindings},
    helper::strings::trim_long_str,
    queryworker::{
        highlevelquery::HighLevelQuery,
        query::{
            createplaylist::{CreatePlaylistParams, CreatePlaylistResponse},
            setmembership::SetMembershipResponse,
            ResponseType, ToQueryWorker,
        },
    },
    session::UserSession,
    statelib::membership::{
        Intent, MembershipKey, MembershipState, Playlist, PlaylistBook, Settlement, ToggleOrigin,
    },
    svclient::{
        response::playlist::NewPlaylist,
        types::{VideoID, Visibility},
    },
};

/// Lists the user's playlists from the perspective of one video, and adds the video to or removes
/// it from them.
pub struct PlaylistPicker {
    book: PlaylistBook,
    video: Option<VideoID>,
    session: Option<UserSession>,
    behaviour: BehaviourConfig,
    /// Ticket of the latest playlist listing. Older listings are ignored.
    list_ticket: Option<usize>,
    liststate: ListState,
    binds: KeyBindings<ListAction>,
}

impl PlaylistPicker {
    pub fn new(
        session: Option<UserSession>,
        behaviour: BehaviourConfig,
        binds: KeyBindings<ListAction>,
    ) -> Self {
        Self {
            book: PlaylistBook::new(),
            video: None,
            session,
            behaviour,
            list_ticket: None,
            liststate: ListState::default(),
            binds,
        }
    }

    /// Keeps the cursor on a row after the playlists changed
    fn clamp_cursor(&mut self) {
        let len = self.book.playlists().len();
        let selected = match self.liststate.selected() {
            _ if len == 0 => None,
            Some(idx) => Some(idx.min(len - 1)),
            None => Some(0),
        };
        self.liststate.select(selected);
    }

    pub fn book(&self) -> &PlaylistBook {
        &self.book
    }

    pub fn video(&self) -> Option<&VideoID> {
        self.video.as_ref()
    }

    fn require_session(&self, what: &str) -> Option<Action> {
        if self.session.is_none() {
            Some(Action::Notify(Notification::error(format!(
                "Sign in to {what}"
            ))))
        } else {
            None
        }
    }

    pub fn list(&mut self) -> Action {
        if let Some(err) = self.require_session("see your playlists") {
            return err;
        }
        let query = ToQueryWorker::new(HighLevelQuery::ListPlaylists);
        self.list_ticket = Some(query.ticket);
        Action::ToQueryWorker(query)
    }

    pub fn pick(&mut self, video: VideoID) -> Action {
        info!(%video, "Picked video");
        self.video = Some(video);
        Action::Multiple(vec![Action::Render, self.list()])
    }

    /// Adds the picked video to the playlist at `index` (counted from 1), or removes it if it is
    /// already there
    pub fn toggle(&mut self, index: usize) -> Action {
        if let Some(err) = self.require_session("change your playlists") {
            return err;
        }
        let Some(video) = self.video.clone() else {
            return Action::Notify(Notification::error("Pick a video first"));
        };
        let descriptor = index
            .checked_sub(1)
            .and_then(|i| self.book.playlists().get(i))
            .map(|p| p.describe(&video));
        let Some(descriptor) = descriptor else {
            return Action::Notify(Notification::error(format!(
                "No playlist at position {index}"
            )));
        };
        let pending = self.book.begin(&descriptor, &video, ToggleOrigin::User);
        debug!(?pending, "Toggling membership");
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::SetMembership(pending)))
    }

    pub fn undo(&mut self, undo: UndoAction) -> Action {
        if let Some(err) = self.require_session("change your playlists") {
            return err;
        }
        let pending = self
            .book
            .begin_with(undo.key, undo.title, undo.intent, ToggleOrigin::Undo);
        debug!(?pending, "Undoing membership change");
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::SetMembership(pending)))
    }

    pub fn create(&mut self, title: String, description: String, visibility: Visibility) -> Action {
        if let Some(err) = self.require_session("create playlists") {
            return err;
        }
        if title.trim().is_empty() || description.trim().is_empty() {
            return Action::Notify(Notification::error(
                "A playlist needs both a title and a description",
            ));
        }
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::CreatePlaylist(
            CreatePlaylistParams {
                playlist: NewPlaylist {
                    title,
                    description,
                    visibility,
                },
                add_video: self.video.clone(),
            },
        )))
    }

    fn refetch(&self) -> Option<Action> {
        if !self.behaviour.refetch_after_toggle || self.session.is_none() {
            return None;
        }
        Some(Action::DelayQuery(
            ToQueryWorker::new(HighLevelQuery::ListPlaylists),
            self.behaviour.refetch_delay_ticks,
        ))
    }

    fn on_membership(&mut self, res: SetMembershipResponse) -> Action {
        let SetMembershipResponse { pending, result } = res;
        let settlement = self.book.settle(&pending, result.is_ok());
        let notification = match (settlement, result) {
            (Settlement::Applied(state), _) => {
                let message = match state {
                    MembershipState::Member => format!("Video added to {}", pending.title),
                    MembershipState::NotMember => format!("Video removed from {}", pending.title),
                };
                let notification = Notification::info(message);
                Some(if pending.origin.offers_undo() {
                    notification.with_undo(UndoAction {
                        key: pending.key.clone(),
                        title: pending.title.clone(),
                        intent: pending.intent.reversed(),
                    })
                } else {
                    notification
                })
            }
            (Settlement::Rejected, result) => {
                let reason = result.err().unwrap_or_default();
                let message = match pending.intent {
                    Intent::Add => format!("Failed to add video to {}: {reason}", pending.title),
                    Intent::Remove => {
                        format!("Failed to remove video from {}: {reason}", pending.title)
                    }
                };
                Some(Notification::error(message))
            }
            (Settlement::Stale, _) => {
                debug!(?pending, "Discarding superseded membership response");
                None
            }
        };
        let mut actions = vec![Action::Render];
        actions.extend(notification.map(Action::Notify));
        actions.extend(self.refetch());
        Action::Multiple(actions)
    }

    fn on_create(&mut self, res: CreatePlaylistResponse) -> Action {
        let remote = match res.result {
            Ok(remote) => remote,
            Err(e) => {
                return Action::Notify(Notification::error(format!(
                    "Failed to create playlist: {e}"
                )))
            }
        };
        let playlist = Playlist::from(remote);
        let (id, title) = (playlist.id.clone(), playlist.title.clone());
        self.book.push(playlist);
        self.clamp_cursor();
        match res.add_video {
            Some(video) => {
                let pending = self.book.begin_with(
                    MembershipKey::new(id, video),
                    title,
                    Intent::Add,
                    ToggleOrigin::Create,
                );
                Action::Multiple(vec![
                    Action::Render,
                    Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::SetMembership(
                        pending,
                    ))),
                ])
            }
            None => Action::Multiple(vec![
                Action::Render,
                Action::Notify(Notification::info(format!("Playlist {title} created"))),
            ]),
        }
    }
}

impl HandleQuery for PlaylistPicker {
    fn handle_query(&mut self, dest: CompID, ticket: usize, res: ResponseType) -> Option<Action> {
        if dest != CompID::PlaylistPicker {
            return None;
        }
        match res {
            ResponseType::ListPlaylists(res) => {
                if self.list_ticket.is_some_and(|latest| latest > ticket) {
                    debug!(ticket, "Ignoring outdated playlist listing");
                    return None;
                }
                match res {
                    Ok(playlists) => {
                        self.book.replace_all(playlists);
                        self.clamp_cursor();
                        Some(Action::Render)
                    }
                    Err(e) => {
                        self.book.clear();
                        self.clamp_cursor();
                        Some(Action::Notify(Notification::error(format!(
                            "Failed to load playlists: {e}"
                        ))))
                    }
                }
            }
            ResponseType::SetMembership(res) => Some(self.on_membership(res)),
            ResponseType::CreatePlaylist(res) => Some(self.on_create(res)),
            _ => None,
        }
    }
}

impl HandleSession for PlaylistPicker {
    fn set_session(&mut self, session: Option<UserSession>) {
        if session.is_none() {
            self.book.clear();
            self.clamp_cursor();
        }
        self.session = session;
    }
}

impl Renderable for PlaylistPicker {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let title = match &self.video {
            Some(video) => format!("Save video {video} to..."),
            None => "Your playlists".to_string(),
        };
        let block = Block::bordered().title(title);
        if self.book.playlists().is_empty() {
            frame.render_widget(Paragraph::new("No playlists").centered().block(block), area);
            return;
        }
        let items: Vec<Line> = self
            .book
            .playlists()
            .iter()
            .map(|p| {
                let title = trim_long_str(&p.title, 40);
                match &self.video {
                    Some(video) => {
                        let mark = if p.contains(video) { "[X]" } else { "[ ]" };
                        let line = Line::raw(format!("{mark} {title} ({})", p.visibility));
                        let key = MembershipKey::new(p.id.clone(), video.clone());
                        if self.book.is_in_flight(&key) {
                            line.italic()
                        } else {
                            line
                        }
                    }
                    None => Line::raw(format!(
                        "{title} ({}, {} videos)",
                        p.visibility,
                        p.videos.len()
                    )),
                }
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::new().reversed())
            .highlight_symbol(">")
            .scroll_padding(1);
        frame.render_stateful_widget(list, area, &mut self.liststate);
    }
}

impl HandleKeySeq<ListAction> for PlaylistPicker {
    fn handle_local_action(&mut self, action: ListAction) -> KeySeqResult {
        if let Some(idx) = cursor::moved(
            self.liststate.selected(),
            self.book.playlists().len(),
            action,
        ) {
            self.liststate.select(Some(idx));
            return KeySeqResult::ActionNeeded(Action::Render);
        }
        match (action, self.liststate.selected()) {
            (ListAction::Confirm, Some(idx)) => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Toggle { index: idx + 1 }))
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
    use crate::components::notifier::NotificationKind;
    use crate::config::{keyparser::KeyParser, Config};
    use crate::helper::testrender::{render, shows};
    use crate::statelib::membership::PendingToggle;
    use crate::svclient::{
        response::playlist::{PlaylistVideoRef, RemotePlaylist},
        types::{PlaylistID, UserID},
    };
    use pretty_assertions::assert_eq;

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

    fn remote(id: &str, title: &str, videos: &[&str]) -> RemotePlaylist {
        RemotePlaylist {
            id: PlaylistID::from(id),
            title: title.to_string(),
            description: String::new(),
            visibility: Visibility::Public,
            videos: videos
                .iter()
                .map(|v| PlaylistVideoRef::Id(VideoID::from(*v)))
                .collect(),
            updated_at: None,
        }
    }

    fn behaviour() -> BehaviourConfig {
        BehaviourConfig {
            undo_timeout_ms: 2000,
            refetch_after_toggle: true,
            refetch_delay_ticks: 1,
        }
    }

    fn binds() -> KeyBindings<ListAction> {
        Config::preset().local.list
    }

    fn keys(seq: &str) -> Vec<crossterm::event::KeyEvent> {
        KeyParser::parse_key_sequence(seq).unwrap()
    }

    fn loaded_picker() -> PlaylistPicker {
        let mut picker = PlaylistPicker::new(Some(session()), behaviour(), binds());
        picker.pick(VideoID::from("v1"));
        let ticket = picker.list_ticket.unwrap();
        picker.handle_query(
            CompID::PlaylistPicker,
            ticket,
            ResponseType::ListPlaylists(Ok(vec![
                remote("p1", "Mix", &["v1"]),
                remote("p2", "Later", &[]),
            ])),
        );
        picker
    }

    fn sent_toggle(action: Action) -> PendingToggle {
        match action {
            Action::ToQueryWorker(ToQueryWorker {
                query: HighLevelQuery::SetMembership(pending),
                ..
            }) => pending,
            other => panic!("Expected a membership query, got {other:?}"),
        }
    }

    fn notifications(action: &Action) -> Vec<Notification> {
        match action {
            Action::Multiple(actions) => actions.iter().flat_map(notifications).collect(),
            Action::Notify(n) => vec![n.clone()],
            _ => vec![],
        }
    }

    fn settle(
        picker: &mut PlaylistPicker,
        pending: &PendingToggle,
        result: Result<(), String>,
    ) -> Action {
        picker
            .handle_query(
                CompID::PlaylistPicker,
                0,
                ResponseType::SetMembership(SetMembershipResponse {
                    pending: pending.clone(),
                    result,
                }),
            )
            .unwrap()
    }

    #[test]
    fn toggle_member_removes() {
        let mut picker = loaded_picker();
        let pending = sent_toggle(picker.toggle(1));
        assert_eq!(pending.intent, Intent::Remove);
        let pending = sent_toggle(picker.toggle(2));
        assert_eq!(pending.intent, Intent::Add);
    }

    #[test]
    fn accepted_toggle_offers_undo() {
        let mut picker = loaded_picker();
        let pending = sent_toggle(picker.toggle(2));
        let res = settle(&mut picker, &pending, Ok(()));
        let n = notifications(&res);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].message, "Video added to Later");
        assert_eq!(n[0].undo.as_ref().unwrap().intent, Intent::Remove);
        assert_eq!(
            picker
                .book()
                .is_member(&PlaylistID::from("p2"), &VideoID::from("v1")),
            Some(true)
        );
        // A refetch is queued
        assert!(matches!(
            res,
            Action::Multiple(ref a) if a.iter().any(|a| matches!(a, Action::DelayQuery(_, 1)))
        ));
    }

    #[test]
    fn failed_toggle_reports_error() {
        let mut picker = loaded_picker();
        let pending = sent_toggle(picker.toggle(1));
        let res = settle(&mut picker, &pending, Err("HTTP 500".to_string()));
        let n = notifications(&res);
        assert_eq!(n.len(), 1);
        assert_eq!(n[0].kind, NotificationKind::Error);
        assert!(n[0].undo.is_none());
        assert_eq!(
            picker
                .book()
                .is_member(&PlaylistID::from("p1"), &VideoID::from("v1")),
            Some(true)
        );
    }

    #[test]
    fn undo_does_not_offer_undo() {
        let mut picker = loaded_picker();
        let pending = sent_toggle(picker.toggle(1));
        let res = settle(&mut picker, &pending, Ok(()));
        let undo = notifications(&res)[0].undo.clone().unwrap();
        let pending = sent_toggle(picker.undo(undo));
        assert_eq!(pending.intent, Intent::Add);
        assert_eq!(pending.origin, ToggleOrigin::Undo);
        let res = settle(&mut picker, &pending, Ok(()));
        let n = notifications(&res);
        assert_eq!(n[0].message, "Video added to Mix");
        assert!(n[0].undo.is_none());
    }

    #[test]
    fn toggle_without_session_sends_nothing() {
        let mut picker = loaded_picker();
        picker.set_session(None);
        let action = picker.toggle(1);
        assert!(matches!(action, Action::Notify(ref n) if n.undo.is_none()));
    }

    #[test]
    fn create_requires_title_and_description() {
        let mut picker = loaded_picker();
        assert!(matches!(
            picker.create("  ".to_string(), "desc".to_string(), Visibility::Private),
            Action::Notify(_)
        ));
        assert!(matches!(
            picker.create("Title".to_string(), "desc".to_string(), Visibility::Private),
            Action::ToQueryWorker(_)
        ));
    }

    #[test]
    fn created_playlist_gets_picked_video() {
        let mut picker = loaded_picker();
        let res = picker
            .handle_query(
                CompID::PlaylistPicker,
                0,
                ResponseType::CreatePlaylist(CreatePlaylistResponse {
                    add_video: Some(VideoID::from("v1")),
                    result: Ok(remote("p3", "New", &[])),
                }),
            )
            .unwrap();
        let Action::Multiple(actions) = res else {
            panic!("Expected multiple actions");
        };
        let pending = sent_toggle(actions[1].clone());
        assert_eq!(pending.origin, ToggleOrigin::Create);
        let res = settle(&mut picker, &pending, Ok(()));
        assert!(notifications(&res)[0].undo.is_none());
        assert_eq!(picker.book().playlists().len(), 3);
    }

    #[test]
    fn outdated_listing_is_ignored() {
        let mut picker = loaded_picker();
        let Action::ToQueryWorker(old) = picker.list() else {
            panic!("Expected a query");
        };
        let Action::ToQueryWorker(new) = picker.list() else {
            panic!("Expected a query");
        };
        picker.handle_query(
            CompID::PlaylistPicker,
            new.ticket,
            ResponseType::ListPlaylists(Ok(vec![])),
        );
        let res = picker.handle_query(
            CompID::PlaylistPicker,
            old.ticket,
            ResponseType::ListPlaylists(Ok(vec![remote("p9", "Old", &[])])),
        );
        assert!(res.is_none());
        assert!(picker.book().playlists().is_empty());
    }

    #[test]
    fn renders_flags() {
        let mut picker = loaded_picker();
        let rows = render(&mut picker, 40, 5);
        assert!(shows(&rows, "Save video v1 to..."));
        assert!(shows(&rows, ">[X] Mix (public)"));
        assert!(shows(&rows, " [ ] Later (public)"));
    }

    #[test]
    fn confirm_toggles_under_cursor() {
        let mut picker = loaded_picker();
        assert_eq!(
            picker.handle_key_seq(&keys("<j>")),
            Some(KeySeqResult::ActionNeeded(Action::Render))
        );
        assert_eq!(
            picker.handle_key_seq(&keys("<enter>")),
            Some(KeySeqResult::ActionNeeded(Action::User(UserAction::Toggle {
                index: 2
            })))
        );
        picker.handle_key_seq(&keys("<g><g>"));
        assert_eq!(
            picker.handle_key_seq(&keys("<space>")),
            Some(KeySeqResult::ActionNeeded(Action::User(UserAction::Toggle {
                index: 1
            })))
        );
        assert_eq!(picker.handle_key_seq(&keys("<x>")), None);
    }
}
