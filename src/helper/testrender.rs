use ratatui::{backend::TestBackend, Terminal};

use crate::components::traits::renderable::Renderable;

/// Draws the component on a blank `width` by `height` screen and returns the rows, without
/// trailing spaces
pub fn render<T: Renderable + ?Sized>(comp: &mut T, width: u16, height: u16) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| comp.draw(frame, frame.area())).unwrap();
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// True if some row contains `needle`
pub fn shows(rows: &[String], needle: &str) -> bool {
    rows.iter().any(|row| row.contains(needle))
}
