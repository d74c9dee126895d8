use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::Line,
    Frame,
};

use crate::{
    action::Action,
    components::traits::{handleraw::HandleRaw, renderable::Renderable},
};

/// Checkbox element, toggled with space while focused
pub struct Checkbox {
    focused: bool,
    toggle: bool,
    /// Helper text next to the checkbox. Must fit in a single line
    label: Line<'static>,
}

impl Checkbox {
    pub fn new(focused: bool, toggle: bool, label: String) -> Self {
        Checkbox {
            focused,
            toggle,
            label: Line::raw(label),
        }
    }

    pub fn toggle(&mut self) {
        self.toggle = !self.toggle;
    }

    pub fn get_toggle(&self) -> bool {
        self.toggle
    }

    pub fn set_enabled(&mut self, enable: bool) {
        self.focused = enable;
    }
}

impl HandleRaw for Checkbox {
    fn handle_raw(&mut self, key: KeyEvent) -> Option<Action> {
        if let KeyCode::Char(' ') = key.code {
            self.toggle();
            return Some(Action::Render);
        }
        None
    }
}

impl Renderable for Checkbox {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let [label, mark] =
            Layout::horizontal([Constraint::Min(1), Constraint::Length(3)]).areas(area);
        frame.render_widget(self.label.clone(), label);
        let mut checkbox = Line::raw(if self.toggle { "[X]" } else { "[ ]" });
        if self.focused {
            checkbox = checkbox.reversed();
        }
        frame.render_widget(checkbox, mark);
    }
}
