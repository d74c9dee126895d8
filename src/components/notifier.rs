use std::time::Duration;

use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Paragraph, Wrap},
    Frame,
};
use strum::Display;
use tokio::time::Instant;

use crate::{
    components::{
        lib::popup,
        traits::{ontick::OnTick, renderable::Renderable},
    },
    statelib::membership::{Intent, MembershipKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Error,
}

/// Reverts a playlist change by applying `intent` to `key`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoAction {
    pub key: MembershipKey,
    pub title: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub undo: Option<UndoAction>,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            message: message.into(),
            undo: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
            undo: None,
        }
    }

    pub fn with_undo(mut self, undo: UndoAction) -> Self {
        self.undo = Some(undo);
        self
    }
}

/// Holds at most one notification. A new one replaces whatever is shown, together with its undo.
pub struct Notifier {
    current: Option<(Notification, Instant)>,
    lifetime: Duration,
    /// Shown under notifications that can be undone
    undo_hint: String,
}

impl Notifier {
    pub fn new(lifetime: Duration, undo_hint: String) -> Self {
        Self {
            current: None,
            lifetime,
            undo_hint,
        }
    }

    pub fn show(&mut self, notification: Notification) {
        self.current = Some((notification, Instant::now() + self.lifetime));
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current
            .as_ref()
            .filter(|(_, expiry)| Instant::now() < *expiry)
            .map(|(n, _)| n)
    }

    /// Takes the undo of the live notification, if there is one. The notification is dismissed.
    pub fn take_undo(&mut self) -> Option<UndoAction> {
        let undo = self.current()?.undo.clone()?;
        self.current = None;
        Some(undo)
    }
}

impl OnTick for Notifier {
    fn on_tick(&mut self) {
        if let Some((_, expiry)) = &self.current {
            if Instant::now() >= *expiry {
                self.current = None;
            }
        }
    }
}

impl Renderable for Notifier {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let Some(n) = self.current() else {
            return;
        };
        let mut lines = vec![Line::raw(n.message.clone())];
        if n.undo.is_some() {
            lines.push(Line::raw(self.undo_hint.clone()).italic());
        }
        let (title, color) = match n.kind {
            NotificationKind::Info => ("Info", Color::Green),
            NotificationKind::Error => ("Error", Color::Red),
        };
        let width = lines
            .iter()
            .map(|l| l.width() + 2)
            .max()
            .unwrap_or_default()
            .clamp(20, 60);
        let inner = width - 2;
        let height: usize = lines
            .iter()
            .map(|l| l.width().div_ceil(inner).max(1))
            .sum::<usize>()
            + 2;
        let area = popup::bottom_right(frame, area, width as u16, height as u16);
        let block = Block::bordered()
            .title(title)
            .border_style(Style::new().fg(color));
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::testrender::{render, shows};
    use crate::svclient::types::{PlaylistID, VideoID};
    use pretty_assertions::assert_eq;

    fn notifier() -> Notifier {
        Notifier::new(Duration::from_millis(2000), "Press <u> to undo".to_string())
    }

    fn undoable() -> Notification {
        Notification::info("Video added to Mix").with_undo(UndoAction {
            key: MembershipKey::new(PlaylistID::from("p1"), VideoID::from("v1")),
            title: "Mix".to_string(),
            intent: Intent::Remove,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn undo_within_window() {
        let mut notifier = notifier();
        notifier.show(undoable());
        tokio::time::advance(Duration::from_millis(1999)).await;
        let undo = notifier.take_undo().unwrap();
        assert_eq!(undo.intent, Intent::Remove);
        // Invoking undo dismisses the notification
        assert!(notifier.current().is_none());
        assert!(notifier.take_undo().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn undo_expires() {
        let mut notifier = notifier();
        notifier.show(undoable());
        tokio::time::advance(Duration::from_millis(2000)).await;
        assert!(notifier.take_undo().is_none());
        notifier.on_tick();
        assert!(notifier.current().is_none());
        assert!(render(&mut notifier, 60, 8).iter().all(|row| row.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_notification_replaces_undo() {
        let mut notifier = notifier();
        notifier.show(undoable());
        notifier.show(Notification::error("Failed to remove video from Mix"));
        assert!(notifier.take_undo().is_none());
        let rows = render(&mut notifier, 80, 10);
        assert!(shows(&rows, "Failed to remove video from Mix"));
        assert!(!shows(&rows, "to undo"));
    }

    #[tokio::test(start_paused = true)]
    async fn popup_sits_in_the_corner() {
        let mut notifier = notifier();
        notifier.show(undoable());
        let rows = render(&mut notifier, 80, 10);
        assert!(rows[9].ends_with('┘'));
        assert!(shows(&rows, "Video added to Mix"));
        assert!(shows(&rows, "Press <u> to undo"));
        assert!(rows[0].is_empty());
    }
}
