use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, Paragraph},
    Frame,
};
use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::{
    action::{localaction::ListAction, useraction::UserAction, Action},
    compid::CompID,
    components::{
        lib::videotable::{VideoCard, VideoTable},
        notifier::Notification,
        traits::{
            handlekeyseq::{HandleKeySeq, KeySeqResult},
            handlequery::HandleQuery,
            handleraw::HandleRaw,
            renderable::Renderable,
        },
    },
    config::keybindings::KeyBindings,
    queryworker::{
        highlevelquery::HighLevelQuery,
        query::{search::SearchResponse, ResponseType, ToQueryWorker},
    },
    svclient::response::channel::RemoteChannel,
};

/// Looks up videos and channels. The input box takes every key while focused.
pub struct Search {
    input: TextArea<'static>,
    typing: bool,
    query: Option<String>,
    channels: Vec<RemoteChannel>,
    table: VideoTable,
    ticket: Option<usize>,
    binds: KeyBindings<ListAction>,
}

impl Search {
    pub fn new(binds: KeyBindings<ListAction>) -> Self {
        let mut res = Self {
            input: TextArea::default(),
            typing: false,
            query: None,
            channels: vec![],
            table: VideoTable::new("Videos"),
            ticket: None,
            binds,
        };
        res.update_style();
        res
    }

    fn update_style(&mut self) {
        let style = if self.typing {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        self.input.set_block(
            Block::default()
                .borders(Borders::ALL)
                .style(style)
                .title("Search"),
        );
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn focus(&mut self) {
        self.typing = true;
        self.update_style();
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn channels(&self) -> &[RemoteChannel] {
        &self.channels
    }

    pub fn cards(&self) -> &[VideoCard] {
        self.table.cards()
    }

    pub fn search(&mut self, query: String) -> Action {
        let query = query.trim().to_string();
        self.typing = false;
        self.update_style();
        if query.is_empty() {
            return Action::Notify(Notification::error("Type something to search for"));
        }
        if self.input.lines().concat() != query {
            self.input = TextArea::new(vec![query.clone()]);
            self.input.move_cursor(tui_textarea::CursorMove::End);
            self.update_style();
        }
        self.query = Some(query.clone());
        let req = ToQueryWorker::new(HighLevelQuery::Search(query));
        self.ticket = Some(req.ticket);
        Action::ToQueryWorker(req)
    }

    /// Runs the last search again
    pub fn refresh(&mut self) -> Option<Action> {
        let query = self.query.clone()?;
        Some(self.search(query))
    }

    fn on_results(&mut self, res: SearchResponse) -> Action {
        let SearchResponse {
            query,
            videos,
            channels,
        } = res;
        // The channel half is best effort
        self.channels = channels.unwrap_or_else(|e| {
            warn!(%query, "Channel search failed: {e}");
            vec![]
        });
        match videos {
            Ok(videos) => {
                self.table.set_videos(&videos);
                Action::Render
            }
            Err(e) => {
                self.table.clear();
                Action::Multiple(vec![
                    Action::Render,
                    Action::Notify(Notification::error(format!("Search failed: {e}"))),
                ])
            }
        }
    }
}

impl HandleQuery for Search {
    fn handle_query(&mut self, dest: CompID, ticket: usize, res: ResponseType) -> Option<Action> {
        if dest != CompID::Search {
            return None;
        }
        let ResponseType::Search(res) = res else {
            return None;
        };
        if self.ticket.is_some_and(|latest| latest > ticket) {
            debug!(ticket, "Ignoring outdated search results");
            return None;
        }
        Some(self.on_results(res))
    }
}

impl HandleRaw for Search {
    fn handle_raw(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.typing = false;
                self.update_style();
                Some(Action::Render)
            }
            KeyCode::Enter => {
                let words: Vec<String> = self
                    .input
                    .lines()
                    .concat()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                if words.is_empty() {
                    Some(self.search(String::new()))
                } else {
                    Some(Action::User(UserAction::Search { query: words }))
                }
            }
            _ => {
                self.input.input(key);
                Some(Action::Render)
            }
        }
    }
}

impl Renderable for Search {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let channel_rows = if self.channels.is_empty() {
            0
        } else {
            self.channels.len().min(4) as u16 + 2
        };
        let [input, channels, videos] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(channel_rows),
            Constraint::Min(3),
        ])
        .areas(area);
        frame.render_widget(&self.input, input);
        if !self.channels.is_empty() {
            let items: Vec<Line> = self
                .channels
                .iter()
                .map(|c| {
                    let name = c.full_name.as_deref().unwrap_or(&c.user_name);
                    Line::raw(format!(
                        "{name} (@{}) {} subscribers",
                        c.user_name, c.subscribers
                    ))
                })
                .collect();
            frame.render_widget(
                List::new(items).block(Block::bordered().title("Channels")),
                channels,
            );
        }
        if self.query.is_some() {
            self.table.draw(frame, videos);
        } else {
            frame.render_widget(
                Paragraph::new("Nothing searched yet").centered(),
                videos,
            );
        }
    }
}

impl HandleKeySeq<ListAction> for Search {
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
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Config;
    use crate::helper::testrender::{render, shows};
    use crate::svclient::{
        response::{user::Owner, video::RemoteVideo},
        types::{ChannelID, VideoID},
    };

    fn typed(search: &mut Search, text: &str) {
        for c in text.chars() {
            search.handle_raw(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn results(query: &str) -> SearchResponse {
        SearchResponse {
            query: query.to_string(),
            videos: Ok(vec![RemoteVideo {
                id: VideoID::from("v1"),
                title: "Funny cats".to_string(),
                description: String::new(),
                owner: Owner {
                    user_name: "bob".to_string(),
                    avatar: None,
                },
                views: 10,
                likes: 0,
                duration: 30.0,
                thumbnail: None,
                video_file: None,
                created_at: None,
            }]),
            channels: Err("HTTP 404".to_string()),
        }
    }

    #[test]
    fn enter_sends_the_words() {
        let mut search = Search::new(Config::preset().local.list);
        search.focus();
        typed(&mut search, " funny  cats ");
        let res = search.handle_raw(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(
            res,
            Some(Action::User(UserAction::Search {
                query: vec!["funny".to_string(), "cats".to_string()]
            }))
        );
    }

    #[test]
    fn blank_search_is_refused() {
        let mut search = Search::new(Config::preset().local.list);
        assert!(matches!(
            search.search("   ".to_string()),
            Action::Notify(_)
        ));
        assert_eq!(search.query(), None);
    }

    #[test]
    fn failed_channel_half_keeps_videos() {
        let mut search = Search::new(Config::preset().local.list);
        let Action::ToQueryWorker(req) = search.search("cats".to_string()) else {
            panic!("Expected a query");
        };
        assert_eq!(req.query, HighLevelQuery::Search("cats".to_string()));
        search.handle_query(
            CompID::Search,
            req.ticket,
            ResponseType::Search(results("cats")),
        );
        assert_eq!(search.cards().len(), 1);
        assert!(search.channels().is_empty());
        let rows = render(&mut search, 80, 10);
        assert!(shows(&rows, "cats"));
        assert!(shows(&rows, ">Funny cats"));
    }

    #[test]
    fn older_results_are_dropped() {
        let mut search = Search::new(Config::preset().local.list);
        let Action::ToQueryWorker(old) = search.search("cats".to_string()) else {
            panic!("Expected a query");
        };
        let Action::ToQueryWorker(new) = search.search("dogs".to_string()) else {
            panic!("Expected a query");
        };
        let mut dogs = results("dogs");
        dogs.videos = Ok(vec![]);
        dogs.channels = Ok(vec![RemoteChannel {
            id: ChannelID::from("c1"),
            user_name: "dogco".to_string(),
            full_name: None,
            avatar: None,
            subscribers: 3,
            description: None,
        }]);
        search.handle_query(CompID::Search, new.ticket, ResponseType::Search(dogs));
        let res = search.handle_query(
            CompID::Search,
            old.ticket,
            ResponseType::Search(results("cats")),
        );
        assert!(res.is_none());
        assert!(search.cards().is_empty());
        assert!(shows(&render(&mut search, 80, 12), "dogco (@dogco) 3 subscribers"));
    }
}
