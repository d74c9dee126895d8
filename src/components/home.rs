use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Paragraph, Tabs},
    Frame,
};
use strum::Display;
use tracing::{info, warn};
use tui_textarea::TextArea;

use crate::{
    action::{globalaction::GlobalAction, useraction::UserAction, Action},
    compid::CompID,
    components::{
        feed::Feed,
        lib::popup,
        liked::Liked,
        login::Login,
        newplaylist::{FormResult, NewPlaylistForm},
        notifier::{Notification, Notifier},
        playlistpicker::PlaylistPicker,
        search::Search,
        subscriptions::Subscriptions,
        traits::{
            component::Component,
            handlekeyseq::{HandleKeySeq, KeySeqResult},
            handlequery::HandleQuery,
            handleraw::HandleRaw,
            handlesession::HandleSession,
            ontick::OnTick,
            renderable::Renderable,
        },
    },
    config::{keybindings::KeyBindings, Config},
    queryworker::{
        highlevelquery::HighLevelQuery,
        query::{login::LoginParams, FromQueryWorker, ResponseType, ToQueryWorker},
    },
    session::UserSession,
    svclient::types::VideoID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Page {
    Account,
    Feed,
    Playlists,
    Subscriptions,
    Search,
    Liked,
}

const PAGES: [Page; 6] = [
    Page::Account,
    Page::Feed,
    Page::Playlists,
    Page::Subscriptions,
    Page::Search,
    Page::Liked,
];

impl Page {
    fn index(self) -> usize {
        PAGES.iter().position(|p| *p == self).unwrap_or_default()
    }

    fn next(self) -> Self {
        PAGES[(self.index() + 1) % PAGES.len()]
    }

    fn prev(self) -> Self {
        PAGES[(self.index() + PAGES.len() - 1) % PAGES.len()]
    }
}

/// Owns the session and every page. Commands, keys and query responses are passed on to the page
/// they belong to.
pub struct Home {
    session: Option<UserSession>,
    picker: PlaylistPicker,
    feed: Feed,
    subs: Subscriptions,
    search: Search,
    liked: Liked,
    login: Login,
    notifier: Notifier,
    page: Page,
    /// Open while a command is being typed
    command: Option<TextArea<'static>>,
    /// Open while a playlist is being created
    create: Option<NewPlaylistForm>,
    binds: KeyBindings<GlobalAction>,
    hints: String,
}

impl Home {
    pub fn new(config: &Config) -> Self {
        let list = &config.local.list;
        let undo_hint = match config.keybindings.find_action_str(&GlobalAction::Undo) {
            Some(key) => format!("Press {key} to undo"),
            None => "Type :undo to revert".to_string(),
        };
        Self {
            session: None,
            picker: PlaylistPicker::new(None, config.behaviour.clone(), list.clone()),
            feed: Feed::new(None, list.clone()),
            subs: Subscriptions::new(None, list.clone()),
            search: Search::new(list.clone()),
            liked: Liked::new(None, list.clone()),
            login: Login::new(),
            notifier: Notifier::new(config.undo_timeout(), undo_hint),
            page: Page::Account,
            command: None,
            create: None,
            binds: config.keybindings.clone(),
            hints: Self::hints(&config.keybindings),
        }
    }

    fn hints(binds: &KeyBindings<GlobalAction>) -> String {
        [
            (GlobalAction::Quit, "quit"),
            (GlobalAction::Command, "command"),
            (GlobalAction::NextTab, "next page"),
            (GlobalAction::Refresh, "refresh"),
            (GlobalAction::NewPlaylist, "new playlist"),
            (GlobalAction::Undo, "undo"),
        ]
        .iter()
        .filter_map(|(action, what)| binds.find_action_str(action).map(|k| format!("{k} {what}")))
        .collect::<Vec<_>>()
        .join("  ")
    }

    /// Asks the server whether the stored cookie still belongs to someone
    pub fn startup() -> Action {
        Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::CurrentUser))
    }

    pub fn session(&self) -> Option<&UserSession> {
        self.session.as_ref()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn picker(&self) -> &PlaylistPicker {
        &self.picker
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn subs(&self) -> &Subscriptions {
        &self.subs
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn liked(&self) -> &Liked {
        &self.liked
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// True while keys go into a text field instead of the keybindings
    pub fn is_typing(&self) -> bool {
        self.command.is_some()
            || self.create.is_some()
            || (self.page == Page::Account && self.session.is_none())
            || (self.page == Page::Search && self.search.is_typing())
    }

    fn set_session(&mut self, session: Option<UserSession>) {
        if self.session != session {
            info!(
                user = session.as_ref().map(|s| s.user_name.as_str()),
                "Session changed"
            );
        }
        self.picker.set_session(session.clone());
        self.feed.set_session(session.clone());
        self.subs.set_session(session.clone());
        self.liked.set_session(session.clone());
        self.session = session;
    }

    fn open(&mut self, page: Page) -> Action {
        match page {
            Page::Account => Action::User(UserAction::Account),
            Page::Feed => Action::User(UserAction::Feed),
            Page::Playlists => Action::User(UserAction::Playlists),
            Page::Subscriptions => Action::User(UserAction::Subs),
            Page::Liked => Action::User(UserAction::Liked),
            Page::Search => {
                self.page = Page::Search;
                if self.search.query().is_none() {
                    self.search.focus();
                }
                Action::Render
            }
        }
    }

    fn refresh(&mut self) -> Action {
        match self.page {
            Page::Account => Home::startup(),
            Page::Feed => self.feed.list(),
            Page::Playlists => self.picker.list(),
            Page::Subscriptions => self.subs.list(),
            Page::Search => self.search.refresh().unwrap_or(Action::Render),
            Page::Liked => self.liked.list(),
        }
    }

    fn run_command(line: &str) -> Action {
        match UserAction::parse_line(line) {
            Ok(Some(action)) => Action::User(action),
            Ok(None) => Action::Render,
            Err(msg) => {
                let first = msg
                    .lines()
                    .find(|l| !l.trim().is_empty())
                    .unwrap_or("Invalid command");
                Action::Notify(Notification::error(
                    first.trim_start_matches("error: ").to_string(),
                ))
            }
        }
    }

    fn handle_user(&mut self, action: UserAction) -> Option<Action> {
        let ret = match action {
            UserAction::Login { user_id, password } => Action::ToQueryWorker(ToQueryWorker::new(
                HighLevelQuery::Login(LoginParams { user_id, password }),
            )),
            UserAction::Logout => {
                Action::ToQueryWorker(ToQueryWorker::new(HighLevelQuery::Logout))
            }
            UserAction::Account => {
                self.page = Page::Account;
                Action::Render
            }
            UserAction::Feed => {
                self.page = Page::Feed;
                self.feed.list()
            }
            UserAction::Watch { video } => {
                self.page = Page::Feed;
                self.feed.watch(VideoID(video))
            }
            UserAction::Playlists => {
                self.page = Page::Playlists;
                Action::Multiple(vec![Action::Render, self.picker.list()])
            }
            UserAction::Pick { video } => {
                self.page = Page::Playlists;
                self.picker.pick(VideoID(video))
            }
            UserAction::Toggle { index } => {
                self.page = Page::Playlists;
                self.picker.toggle(index)
            }
            UserAction::Undo => match self.notifier.take_undo() {
                Some(undo) => Action::Multiple(vec![Action::Render, self.picker.undo(undo)]),
                None => Action::Notify(Notification::info("Nothing to undo")),
            },
            UserAction::NewPlaylist => {
                if self.session.is_none() {
                    Action::Notify(Notification::error("Sign in to create playlists"))
                } else {
                    self.create = Some(NewPlaylistForm::new());
                    Action::Render
                }
            }
            UserAction::Subs => {
                self.page = Page::Subscriptions;
                self.subs.list()
            }
            UserAction::Subscribe { index } => {
                self.page = Page::Subscriptions;
                self.subs.toggle(index)
            }
            UserAction::Search { query } => {
                self.page = Page::Search;
                self.search.search(query.join(" "))
            }
            UserAction::Like => self.feed.like(),
            UserAction::Liked => {
                self.page = Page::Liked;
                Action::Multiple(vec![Action::Render, self.liked.list()])
            }
            UserAction::Quit => Action::Quit,
        };
        Some(ret)
    }

    fn handle_own_query(&mut self, res: ResponseType) -> Option<Action> {
        match res {
            ResponseType::Login(Ok(())) => {
                self.login.reset();
                Some(Action::Multiple(vec![
                    Action::Notify(Notification::info("Signed in")),
                    Home::startup(),
                ]))
            }
            ResponseType::Login(Err(e)) => {
                self.login.failed(e.clone());
                Some(Action::Notify(Notification::error(format!(
                    "Login failed: {e}"
                ))))
            }
            ResponseType::Logout(Ok(())) => {
                self.set_session(None);
                self.page = Page::Account;
                Some(Action::Notify(Notification::info("Signed out")))
            }
            ResponseType::Logout(Err(e)) => Some(Action::Notify(Notification::error(format!(
                "Logout failed: {e}"
            )))),
            ResponseType::CurrentUser(Ok(user)) => {
                self.set_session(user.map(UserSession::from));
                Some(Action::Render)
            }
            ResponseType::CurrentUser(Err(e)) => {
                warn!("Failed to check the session: {e}");
                self.set_session(None);
                Some(Action::Notify(Notification::error(format!(
                    "Could not reach the server: {e}"
                ))))
            }
            _ => None,
        }
    }

    fn handle_query(&mut self, res: FromQueryWorker) -> Option<Action> {
        let FromQueryWorker { dest, ticket, res } = res;
        match dest {
            CompID::Home => self.handle_own_query(res),
            CompID::PlaylistPicker => self.picker.handle_query(dest, ticket, res),
            CompID::Feed => self.feed.handle_query(dest, ticket, res),
            CompID::Subscriptions => self.subs.handle_query(dest, ticket, res),
            CompID::Search => self.search.handle_query(dest, ticket, res),
            CompID::Liked => self.liked.handle_query(dest, ticket, res),
        }
    }

    fn draw_account(&mut self, frame: &mut Frame, area: Rect) {
        let Some(s) = &self.session else {
            self.login.draw(frame, area);
            return;
        };
        let mut lines = vec![
            Line::raw(format!("Signed in as @{}", s.user_name)).bold(),
            Line::raw(s.describe()),
        ];
        if let Some(key) = self.binds.find_action_str(&GlobalAction::Logout) {
            lines.push(Line::default());
            lines.push(Line::raw(format!("Press {key} to sign out")).dim());
        }
        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title("Account")),
            area,
        );
    }
}

impl Component for Home {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(match action {
            Action::User(action) => self.handle_user(action),
            Action::FromQueryWorker(res) => self.handle_query(res),
            Action::Notify(notification) => {
                self.notifier.show(notification);
                Some(Action::Render)
            }
            Action::Tick => {
                self.notifier.on_tick();
                None
            }
            _ => None,
        })
    }
}

impl HandleRaw for Home {
    fn handle_raw(&mut self, key: KeyEvent) -> Option<Action> {
        if let Some(command) = &mut self.command {
            return match key.code {
                KeyCode::Esc => {
                    self.command = None;
                    Some(Action::Render)
                }
                KeyCode::Enter => {
                    let line = command.lines().concat();
                    self.command = None;
                    Some(Home::run_command(&line))
                }
                _ => {
                    command.input(key);
                    Some(Action::Render)
                }
            };
        }
        if let Some(form) = &mut self.create {
            return match form.handle_raw(key) {
                FormResult::Editing => Some(Action::Render),
                FormResult::Cancel => {
                    self.create = None;
                    Some(Action::Render)
                }
                FormResult::Submit(p) => {
                    self.create = None;
                    Some(Action::Multiple(vec![
                        Action::Render,
                        self.picker.create(p.title, p.description, p.visibility),
                    ]))
                }
            };
        }
        match self.page {
            Page::Account if self.session.is_none() => self.login.handle_raw(key),
            Page::Search if self.search.is_typing() => self.search.handle_raw(key),
            _ => None,
        }
    }
}

impl HandleKeySeq<GlobalAction> for Home {
    fn pass_to_lower_comp(&mut self, keyseq: &[KeyEvent]) -> Option<KeySeqResult> {
        match self.page {
            Page::Account => None,
            Page::Feed => self.feed.handle_key_seq(keyseq),
            Page::Playlists => self.picker.handle_key_seq(keyseq),
            Page::Subscriptions => self.subs.handle_key_seq(keyseq),
            Page::Search => self.search.handle_key_seq(keyseq),
            Page::Liked => self.liked.handle_key_seq(keyseq),
        }
    }

    fn handle_local_action(&mut self, action: GlobalAction) -> KeySeqResult {
        let action = match action {
            GlobalAction::Quit => Action::Quit,
            GlobalAction::Command => {
                let mut command = TextArea::default();
                command.set_cursor_line_style(Style::default());
                self.command = Some(command);
                Action::Render
            }
            GlobalAction::Undo => Action::User(UserAction::Undo),
            GlobalAction::NextTab => self.open(self.page.next()),
            GlobalAction::PrevTab => self.open(self.page.prev()),
            GlobalAction::Account => self.open(Page::Account),
            GlobalAction::Feed => self.open(Page::Feed),
            GlobalAction::Playlists => self.open(Page::Playlists),
            GlobalAction::Subscriptions => self.open(Page::Subscriptions),
            GlobalAction::Search => {
                self.search.focus();
                self.open(Page::Search)
            }
            GlobalAction::Liked => self.open(Page::Liked),
            GlobalAction::Refresh => self.refresh(),
            GlobalAction::NewPlaylist => Action::User(UserAction::NewPlaylist),
            GlobalAction::Logout => Action::User(UserAction::Logout),
            GlobalAction::EndKeySeq => return KeySeqResult::NoActionNeeded,
        };
        KeySeqResult::ActionNeeded(action)
    }

    fn get_keybinds(&self) -> &KeyBindings<GlobalAction> {
        &self.binds
    }
}

impl Renderable for Home {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [top, main, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let user = match &self.session {
            Some(s) => format!("@{}", s.user_name),
            None => "Not signed in".to_string(),
        };
        let [tabs, user_area] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(user.len() as u16 + 1)])
                .areas(top);
        frame.render_widget(
            Tabs::new(PAGES.iter().map(|p| p.to_string()))
                .select(self.page.index())
                .highlight_style(Style::new().reversed()),
            tabs,
        );
        frame.render_widget(Line::raw(user).right_aligned(), user_area);

        match self.page {
            Page::Account => self.draw_account(frame, main),
            Page::Feed => self.feed.draw(frame, main),
            Page::Playlists => self.picker.draw(frame, main),
            Page::Subscriptions => self.subs.draw(frame, main),
            Page::Search => self.search.draw(frame, main),
            Page::Liked => self.liked.draw(frame, main),
        }

        match &self.command {
            Some(command) => {
                let [prompt, input] =
                    Layout::horizontal([Constraint::Length(1), Constraint::Min(1)]).areas(bottom);
                frame.render_widget(Span::raw(":"), prompt);
                frame.render_widget(command, input);
            }
            None => frame.render_widget(Line::raw(self.hints.as_str()).dim(), bottom),
        }

        if let Some(form) = &mut self.create {
            let area = popup::centered(frame, main, 60, 11);
            form.draw(frame, area);
        }
        self.notifier.draw(frame, main);
    }
}
