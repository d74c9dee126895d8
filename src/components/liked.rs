use ratatui::{layout::Rect, Frame};
use tracing::debug;

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
        query::{ResponseType, ToQueryWorker},
    },
    session::UserSession,
};

pub struct Liked {
    session: Option<UserSession>,
    table: VideoTable,
    ticket: Option<usize>,
    binds: KeyBindings<ListAction>,
}

impl Liked {
    pub fn new(session: Option<UserSession>, binds: KeyBindings<ListAction>) -> Self {
        Self {
            session,
            table: VideoTable::new("Liked videos"),
            ticket: None,
            binds,
        }
    }

    pub fn cards(&self) -> &[VideoCard] {
        self.table.cards()
    }

    pub fn list(&mut self) -> Action {
        if self.session.is_none() {
            return Action::Notify(Notification::error("Sign in to see your liked videos"));
        }
        let query = ToQueryWorker::new(HighLevelQuery::LikedVideos);
        self.ticket = Some(query.ticket);
        Action::ToQueryWorker(query)
    }
}

impl HandleQuery for Liked {
    fn handle_query(&mut self, dest: CompID, ticket: usize, res: ResponseType) -> Option<Action> {
        if dest != CompID::Liked {
            return None;
        }
        let ResponseType::LikedVideos(res) = res else {
            return None;
        };
        if self.ticket.is_some_and(|latest| latest > ticket) {
            debug!(ticket, "Ignoring outdated liked videos");
            return None;
        }
        match res {
            Ok(videos) => {
                self.table.set_videos(&videos);
                Some(Action::Render)
            }
            Err(e) => {
                self.table.clear();
                Some(Action::Multiple(vec![
                    Action::Render,
                    Action::Notify(Notification::error(format!(
                        "Failed to load liked videos: {e}"
                    ))),
                ]))
            }
        }
    }
}

impl HandleSession for Liked {
    fn set_session(&mut self, session: Option<UserSession>) {
        if session.is_none() {
            self.table.clear();
        }
        self.session = session;
    }
}

impl Renderable for Liked {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        self.table.draw(frame, area);
    }
}

impl HandleKeySeq<ListAction> for Liked {
    fn handle_local_action(&mut self, action: ListAction) -> KeySeqResult {
        if self.table.navigate(action) {
            return KeySeqResult::ActionNeeded(Action::Render);
        }
        let Some(card) = self.table.selected() else {
            return KeySeqResult::NoActionNeeded;
        };
        let video = card.id.to_string();
        match action {
            ListAction::Confirm => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Watch { video }))
            }
            ListAction::Pick => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Pick { video }))
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
    use crate::config::Config;
    use crate::svclient::types::UserID;

    #[test]
    fn guests_have_no_liked_videos() {
        let mut liked = Liked::new(None, Config::preset().local.list);
        assert!(matches!(liked.list(), Action::Notify(_)));
        liked.set_session(Some(UserSession {
            id: UserID("u1".to_string()),
            user_name: "alice".to_string(),
            email: String::new(),
            full_name: None,
            subscribers_count: 0,
            subscribed_count: 0,
        }));
        assert!(matches!(liked.list(), Action::ToQueryWorker(_)));
    }

    #[test]
    fn failure_empties_the_list() {
        let mut liked = Liked::new(None, Config::preset().local.list);
        let res = liked.handle_query(
            CompID::Liked,
            0,
            ResponseType::LikedVideos(Err("HTTP 500".to_string())),
        );
        assert!(matches!(res, Some(Action::Multiple(_))));
        assert!(liked.cards().is_empty());
    }
}
