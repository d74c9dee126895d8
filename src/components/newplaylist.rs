use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::{
    components::{
        lib::checkbox::Checkbox,
        traits::{handleraw::HandleRaw, renderable::Renderable},
    },
    svclient::{response::playlist::NewPlaylist, types::Visibility},
};

#[derive(Default, PartialEq)]
enum Field {
    #[default]
    Title,
    Description,
    Public,
}

pub enum FormResult {
    Editing,
    Cancel,
    Submit(NewPlaylist),
}

/// Form for a new playlist. The picked video, if any, goes into the playlist once it exists.
pub struct NewPlaylistForm {
    title: TextArea<'static>,
    description: TextArea<'static>,
    public: Checkbox,
    field: Field,
    status_msg: Option<String>,
}

impl NewPlaylistForm {
    pub fn new() -> Self {
        let mut res = Self {
            title: TextArea::default(),
            description: TextArea::default(),
            public: Checkbox::new(false, true, "Public".to_string()),
            field: Field::default(),
            status_msg: None,
        };
        res.update_style();
        res
    }

    fn update_style(&mut self) {
        fn change_style(textarea: &mut TextArea<'_>, enable: bool, title: &'static str) {
            let (cursor, border) = if enable {
                (
                    Style::default().add_modifier(Modifier::REVERSED),
                    Style::default(),
                )
            } else {
                (Style::default(), Style::default().fg(Color::DarkGray))
            };
            textarea.set_cursor_style(cursor);
            textarea.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .style(border)
                    .title(title),
            );
        }
        change_style(&mut self.title, self.field == Field::Title, "Title");
        change_style(
            &mut self.description,
            self.field == Field::Description,
            "Description",
        );
        self.public.set_enabled(self.field == Field::Public);
    }

    fn navigate(&mut self, up: bool) {
        self.field = match (&self.field, up) {
            (Field::Title, false) | (Field::Public, true) => Field::Description,
            (Field::Description, false) | (Field::Title, true) => Field::Public,
            (Field::Public, false) | (Field::Description, true) => Field::Title,
        };
        self.update_style();
    }

    fn submit(&mut self) -> FormResult {
        let title = self.title.lines().concat().trim().to_string();
        let description = self.description.lines().concat().trim().to_string();
        if title.is_empty() || description.is_empty() {
            self.status_msg = Some("A playlist needs both a title and a description".to_string());
            return FormResult::Editing;
        }
        let visibility = if self.public.get_toggle() {
            Visibility::Public
        } else {
            Visibility::Private
        };
        FormResult::Submit(NewPlaylist {
            title,
            description,
            visibility,
        })
    }

    pub fn handle_raw(&mut self, key: KeyEvent) -> FormResult {
        match key.code {
            KeyCode::Esc => FormResult::Cancel,
            KeyCode::Enter => self.submit(),
            KeyCode::Up | KeyCode::BackTab => {
                self.navigate(true);
                FormResult::Editing
            }
            KeyCode::Down | KeyCode::Tab => {
                self.navigate(false);
                FormResult::Editing
            }
            _ => {
                match self.field {
                    Field::Title => {
                        self.title.input(key);
                    }
                    Field::Description => {
                        self.description.input(key);
                    }
                    Field::Public => {
                        self.public.handle_raw(key);
                    }
                }
                FormResult::Editing
            }
        }
    }
}

impl Renderable for NewPlaylistForm {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title("New playlist");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let [title, description, public, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);
        frame.render_widget(&self.title, title);
        frame.render_widget(&self.description, description);
        self.public.draw(frame, public);
        let status_line = self
            .status_msg
            .as_deref()
            .unwrap_or("Enter: Create  Esc: Cancel  Space: Toggle");
        frame.render_widget(Paragraph::new(status_line).centered(), status);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::helper::testrender::{render, shows};

    fn press(form: &mut NewPlaylistForm, code: KeyCode) -> FormResult {
        form.handle_raw(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn typed(form: &mut NewPlaylistForm, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn private_playlist_from_form() {
        let mut form = NewPlaylistForm::new();
        typed(&mut form, "Mix");
        press(&mut form, KeyCode::Tab);
        typed(&mut form, "Things");
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Char(' '));
        let rows = render(&mut form, 50, 11);
        assert!(rows.iter().any(|r| r.contains("Public") && r.contains("[ ]")));
        let FormResult::Submit(playlist) = press(&mut form, KeyCode::Enter) else {
            panic!("Expected the form to be submitted");
        };
        assert_eq!(
            playlist,
            NewPlaylist {
                title: "Mix".to_string(),
                description: "Things".to_string(),
                visibility: Visibility::Private,
            }
        );
    }

    #[test]
    fn missing_description_keeps_form_open() {
        let mut form = NewPlaylistForm::new();
        typed(&mut form, "Mix");
        assert!(matches!(press(&mut form, KeyCode::Enter), FormResult::Editing));
        assert!(shows(
            &render(&mut form, 60, 11),
            "A playlist needs both a title and a description"
        ));
        assert!(matches!(press(&mut form, KeyCode::Esc), FormResult::Cancel));
    }
}
