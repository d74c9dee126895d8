use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    widgets::Clear,
    Frame,
};

/// Clears a `width` by `height` area in the middle of `area` and returns it. The popup shrinks to
/// fit small terminals.
pub fn centered(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Clear, area);
    area
}

/// Same as [`centered`], but in the bottom right corner
pub fn bottom_right(frame: &mut Frame, area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::End)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::End)
        .areas(area);
    frame.render_widget(Clear, area);
    area
}
