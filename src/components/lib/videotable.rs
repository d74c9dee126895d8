use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Style, Stylize},
    widgets::{Block, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::{
    action::localaction::ListAction,
    components::{lib::cursor, traits::renderable::Renderable},
    helper::format::{format_duration, format_views, time_ago},
    svclient::{response::video::RemoteVideo, types::VideoID},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoCard {
    pub id: VideoID,
    pub title: String,
    pub channel: String,
    pub views: String,
    pub duration: String,
    pub time: String,
}

impl VideoCard {
    pub fn new(video: &RemoteVideo, now: DateTime<Utc>) -> Self {
        Self {
            id: video.id.clone(),
            title: video.title.clone(),
            channel: video.owner.user_name.clone(),
            views: format_views(video.views),
            duration: format_duration(video.duration),
            time: video
                .created_at
                .as_deref()
                .map(|t| time_ago(t, now))
                .unwrap_or_default(),
        }
    }
}

/// Video listing shared by the feed, the search results and the liked videos
pub struct VideoTable {
    title: String,
    cards: Vec<VideoCard>,
    state: TableState,
}

impl VideoTable {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            cards: vec![],
            state: TableState::default(),
        }
    }

    pub fn set_videos(&mut self, videos: &[RemoteVideo]) {
        let now = Utc::now();
        self.cards = videos.iter().map(|v| VideoCard::new(v, now)).collect();
        self.state
            .select(if self.cards.is_empty() { None } else { Some(0) });
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.state.select(None);
    }

    pub fn cards(&self) -> &[VideoCard] {
        &self.cards
    }

    pub fn selected(&self) -> Option<&VideoCard> {
        self.cards.get(self.state.selected()?)
    }

    /// Moves the cursor. Returns false if `action` is not a movement.
    pub fn navigate(&mut self, action: ListAction) -> bool {
        match cursor::moved(self.state.selected(), self.cards.len(), action) {
            Some(idx) => {
                self.state.select(Some(idx));
                true
            }
            None => matches!(
                action,
                ListAction::Up | ListAction::Down | ListAction::Top | ListAction::Bottom
            ),
        }
    }
}

impl Renderable for VideoTable {
    fn draw(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title(self.title.clone());
        if self.cards.is_empty() {
            frame.render_widget(Paragraph::new("No videos").centered().block(block), area);
            return;
        }
        let rows = self.cards.iter().map(|c| {
            Row::new(vec![
                c.title.clone(),
                c.channel.clone(),
                c.views.clone(),
                c.duration.clone(),
                c.time.clone(),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Length(7),
                Constraint::Length(7),
                Constraint::Length(15),
            ],
        )
        .header(Row::new(vec!["Title", "Channel", "Views", "Length", "Uploaded"]).bold())
        .block(block)
        .row_highlight_style(Style::new().reversed())
        .highlight_symbol(">");
        frame.render_stateful_widget(table, area, &mut self.state);
    }
}
