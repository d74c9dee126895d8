use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::{Style, Stylize},
    text::Line,
    widgets::{Block, List, ListState, Paragraph},
    Frame,
};
use tracing::{debug, warn};

use crate::{
    action::{localaction::ListAction, useraction::UserAction, Action},
    compid::CompID,
    components::{
        lib::cursor,
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
        query::{togglesubscribe::ToggleSubscribeParams, ResponseType, ToQueryWorker},
    },
    session::UserSession,
    svclient::{response::channel::RemoteChannel, types::ChannelID},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelCard {
    pub id: ChannelID,
    pub user_name: String,
    pub full_name: Option<String>,
    pub is_subscribed: bool,
    pub subscriber_count: u64,
}

impl From<RemoteChannel> for ChannelCard {
    fn from(channel: RemoteChannel) -> Self {
        Self {
            id: channel.id,
            user_name: channel.user_name,
            full_name: channel.full_name,
            // Everything in this listing is subscribed to
            is_subscribed: true,
            subscriber_count: channel.subscribers,
        }
    }
}

/// State of a card before its latest optimistic update
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    generation: u64,
    is_subscribed: bool,
    subscriber_count: u64,
}

pub struct Subscriptions {
    session: Option<UserSession>,
    channels: Vec<ChannelCard>,
    pending: HashMap<ChannelID, Snapshot>,
    generation: u64,
    liststate: ListState,
    binds: KeyBindings<ListAction>,
}

impl Subscriptions {
    pub fn new(session: Option<UserSession>, binds: KeyBindings<ListAction>) -> Self {
        Self {
            session,
            channels: vec![],
            pending: HashMap::new(),
            generation: 0,
            liststate: ListState::default(),
            binds,
        }
    }

    pub fn channels(&self) -> &[ChannelCard] {
        &self.channels
    }

    pub fn list(&mut self) -> Action {
        if self.session.is_none() {
            return Action::Notify(Notification::error("Sign in to see your subscriptions"));
        }
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::ListSubscriptions))
    }

    /// Flips the subscription of the channel at `index` (counted from 1) right away, then asks the
    /// server to do the same
    pub fn toggle(&mut self, index: usize) -> Action {
        if self.session.is_none() {
            return Action::Notify(Notification::error("Sign in to subscribe"));
        }
        let Some(card) = index
            .checked_sub(1)
            .and_then(|i| self.channels.get_mut(i))
        else {
            return Action::Notify(Notification::error(format!(
                "No channel at position {index}"
            )));
        };
        self.generation += 1;
        self.pending.insert(
            card.id.clone(),
            Snapshot {
                generation: self.generation,
                is_subscribed: card.is_subscribed,
                subscriber_count: card.subscriber_count,
            },
        );
        card.is_subscribed = !card.is_subscribed;
        card.subscriber_count = if card.is_subscribed {
            card.subscriber_count + 1
        } else {
            card.subscriber_count.saturating_sub(1)
        };
        Action::Multiple(vec![
            Action::Render,
            Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::ToggleSubscribe(
                ToggleSubscribeParams {
                    channel: card.id.clone(),
                    generation: self.generation,
                },
            ))),
        ])
    }

    fn on_toggled(
        &mut self,
        params: ToggleSubscribeParams,
        result: Result<(), String>,
    ) -> Option<Action> {
        let latest = self
            .pending
            .get(&params.channel)
            .is_some_and(|s| s.generation == params.generation);
        if !latest {
            debug!(?params, "Ignoring superseded subscription response");
            return None;
        }
        let snapshot = self.pending.remove(&params.channel)?;
        let Err(e) = result else {
            return None;
        };
        warn!(?params, "Subscription change failed: {e}");
        if let Some(card) = self.channels.iter_mut().find(|c| c.id == params.channel) {
            card.is_subscribed = snapshot.is_subscribed;
            card.subscriber_count = snapshot.subscriber_count;
        }
        Some(Action::Multiple(vec![
            Action::Render,
            Action::Notify(Notification::error(format!(
                "Failed to update subscription: {e}"
            ))),
        ]))
    }
}

impl HandleQuery for Subscriptions {
    fn handle_query(&mut self, dest: CompID, _ticket: usize, res: ResponseType) -> Option<Action> {
        if dest != CompID::Subscriptions {
            return None;
        }
        match res {
            ResponseType::ListSubscriptions(Ok(channels)) => {
                self.pending.clear();
                self.channels = channels.into_iter().map(ChannelCard::from).collect();
                self.liststate
                    .select(if self.channels.is_empty() { None } else { Some(0) });
                Some(Action::Render)
            }
            ResponseType::ListSubscriptions(Err(e)) => {
                self.channels.clear();
                self.liststate.select(None);
                Some(Action::Notify(Notification::error(format!(
                    "Failed to load subscriptions: {e}"
                ))))
            }
            ResponseType::ToggleSubscribe { params, result } => self.on_toggled(params, result),
            _ => None,
        }
    }
}

impl HandleSession for Subscriptions {
    fn set_session(&mut self, session: Option<UserSession>) {
        if session.is_none() {
            self.channels.clear();
            self.pending.clear();
            self.liststate.select(None);
        }
        self.session = session;
    }
}

impl Renderable for Subscriptions {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title("Subscriptions");
        if self.channels.is_empty() {
            frame.render_widget(
                Paragraph::new("No subscriptions").centered().block(block),
                area,
            );
            return;
        }
        let items: Vec<Line> = self
            .channels
            .iter()
            .map(|c| {
                let name = c.full_name.as_deref().unwrap_or(&c.user_name);
                let line = Line::raw(format!(
                    "{name} (@{}) {} subscribers",
                    c.user_name, c.subscriber_count
                ));
                if c.is_subscribed {
                    line
                } else {
                    line.dim()
                }
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::new().reversed())
            .highlight_symbol(">");
        frame.render_stateful_widget(list, area, &mut self.liststate);
    }
}

impl HandleKeySeq<ListAction> for Subscriptions {
    fn handle_local_action(&mut self, action: ListAction) -> KeySeqResult {
        if let Some(idx) = cursor::moved(self.liststate.selected(), self.channels.len(), action) {
            self.liststate.select(Some(idx));
            return KeySeqResult::ActionNeeded(Action::Render);
        }
        match (action, self.liststate.selected()) {
            (ListAction::Confirm, Some(idx)) => {
                KeySeqResult::ActionNeeded(Action::User(UserAction::Subscribe { index: idx + 1 }))
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
    use crate::svclient::types::UserID;
    use pretty_assertions::assert_eq;

    fn loaded() -> Subscriptions {
        let session = UserSession {
            id: UserID("u1".to_string()),
            user_name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            subscribers_count: 0,
            subscribed_count: 1,
        };
        let mut subs = Subscriptions::new(Some(session), Config::preset().local.list);
        subs.handle_query(
            CompID::Subscriptions,
            0,
            ResponseType::ListSubscriptions(Ok(vec![RemoteChannel {
                id: ChannelID::from("c1"),
                user_name: "bob".to_string(),
                full_name: None,
                avatar: None,
                subscribers: 1,
                description: None,
            }])),
        );
        subs
    }

    fn sent(action: Action) -> ToggleSubscribeParams {
        let Action::Multiple(actions) = action else {
            panic!("Expected multiple actions");
        };
        match &actions[1] {
            Action::ToQueryWorker(ToQueryWorker {
                query: HighLevelQuery::ToggleSubscribe(params),
                ..
            }) => params.clone(),
            other => panic!("Expected a subscription query, got {other:?}"),
        }
    }

    fn respond(
        subs: &mut Subscriptions,
        params: ToggleSubscribeParams,
        result: Result<(), String>,
    ) -> Option<Action> {
        subs.handle_query(
            CompID::Subscriptions,
            0,
            ResponseType::ToggleSubscribe { params, result },
        )
    }

    #[test]
    fn failed_toggle_rolls_back() {
        let mut subs = loaded();
        let params = sent(subs.toggle(1));
        assert!(!subs.channels()[0].is_subscribed);
        assert_eq!(subs.channels()[0].subscriber_count, 0);

        let res = respond(&mut subs, params, Err("offline".to_string()));
        assert!(res.is_some());
        assert!(subs.channels()[0].is_subscribed);
        assert_eq!(subs.channels()[0].subscriber_count, 1);
    }

    #[test]
    fn count_never_negative() {
        let mut subs = loaded();
        subs.channels[0].subscriber_count = 0;
        subs.toggle(1);
        assert_eq!(subs.channels()[0].subscriber_count, 0);
    }

    #[test]
    fn stale_failure_keeps_newer_state() {
        let mut subs = loaded();
        let first = sent(subs.toggle(1));
        let second = sent(subs.toggle(1));
        assert!(respond(&mut subs, first, Err("offline".to_string())).is_none());
        assert!(subs.channels()[0].is_subscribed);
        assert!(respond(&mut subs, second, Ok(())).is_none());
        assert!(subs.channels()[0].is_subscribed);
    }

    #[test]
    fn confirm_flips_the_channel_under_cursor() {
        let mut subs = loaded();
        assert!(shows(&render(&mut subs, 50, 4), ">bob (@bob) 1 subscribers"));
        let res = subs.handle_key_seq(&KeyParser::parse_key_sequence("<enter>").unwrap());
        assert_eq!(
            res,
            Some(KeySeqResult::ActionNeeded(Action::User(UserAction::Subscribe {
                index: 1
            })))
        );
    }
}
