use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::{
    action::{useraction::UserAction, Action},
    components::traits::{handleraw::HandleRaw, renderable::Renderable},
};

#[derive(Default, PartialEq)]
enum Mode {
    #[default]
    UserId,
    Password,
}

/// Sign in form shown on the account page while nobody is signed in
pub struct Login {
    user_id: TextArea<'static>,
    password: TextArea<'static>,
    mode: Mode,
    /// Waiting for the server to answer
    pending: bool,
    status_msg: Option<String>,
}

impl Login {
    pub fn new() -> Self {
        let mut res = Self {
            user_id: TextArea::default(),
            password: TextArea::default(),
            mode: Mode::default(),
            pending: false,
            status_msg: None,
        };
        res.password.set_mask_char('*');
        res.update_style();
        res
    }

    fn update_style(&mut self) {
        fn change_style(textarea: &mut TextArea<'_>, enable: bool, title: &'static str) {
            if enable {
                textarea.set_cursor_line_style(Style::default().add_modifier(Modifier::UNDERLINED));
                textarea.set_cursor_style(Style::default().add_modifier(Modifier::REVERSED));
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .style(Style::default())
                        .title(title),
                );
            } else {
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(Style::default());
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .style(Style::default().fg(Color::DarkGray))
                        .title(title),
                );
            }
        }
        change_style(
            &mut self.user_id,
            self.mode == Mode::UserId && !self.pending,
            "User name or email",
        );
        change_style(
            &mut self.password,
            self.mode == Mode::Password && !self.pending,
            "Password",
        );
    }

    fn navigate(&mut self) {
        if self.pending {
            return;
        }
        self.mode = match self.mode {
            Mode::UserId => Mode::Password,
            Mode::Password => Mode::UserId,
        };
        self.update_style();
    }

    fn submit(&mut self) -> Option<Action> {
        let user_id = self.user_id.lines().concat().trim().to_string();
        let password = self.password.lines().concat();
        if user_id.is_empty() || password.is_empty() {
            self.status_msg = Some("Enter your user name and password".to_string());
            return Some(Action::Render);
        }
        self.pending = true;
        self.status_msg = Some("Signing in...".to_string());
        self.update_style();
        Some(Action::User(UserAction::Login { user_id, password }))
    }

    /// The server refused the last attempt
    pub fn failed(&mut self, msg: String) {
        self.pending = false;
        self.status_msg = Some(format!("Failed to sign in: {msg}"));
        self.update_style();
    }

    /// Empties the form once someone is signed in
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl HandleRaw for Login {
    fn handle_raw(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::BackTab | KeyCode::Down | KeyCode::Tab => {
                self.navigate();
                Some(Action::Render)
            }
            KeyCode::Esc => Some(Action::User(UserAction::Feed)),
            KeyCode::Enter if !self.pending => self.submit(),
            _ if self.pending => None,
            _ => {
                match self.mode {
                    Mode::UserId => self.user_id.input(key),
                    Mode::Password => self.password.input(key),
                };
                Some(Action::Render)
            }
        }
    }
}

impl Renderable for Login {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [horizontal] = Layout::horizontal([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(area);
        let [centered] = Layout::vertical([Constraint::Length(12)])
            .flex(Flex::Center)
            .areas(horizontal);
        let [user_id, password, help, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(centered);
        frame.render_widget(&self.user_id, user_id);
        frame.render_widget(&self.password, password);
        frame.render_widget(
            Paragraph::new(vec![
                Line::raw("Enter: Sign in"),
                Line::raw("Tab or arrow keys: Navigate"),
                Line::raw("Esc: Browse without signing in"),
            ])
            .centered(),
            help,
        );
        if let Some(msg) = &self.status_msg {
            frame.render_widget(
                Paragraph::new(msg.as_str())
                    .centered()
                    .wrap(Wrap { trim: false }),
                status,
            );
        }
    }
}
