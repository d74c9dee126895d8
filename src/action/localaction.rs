use std::fmt::Display;

use serde::Deserialize;

/// Actions for every page that shows a list
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum ListAction {
    /// Move one up in the list
    Up,
    /// Move one down in the list
    Down,
    /// Move to the top of the list
    Top,
    /// Move to the bottom of the list
    Bottom,
    /// Open the video, toggle the playlist, or toggle the subscription under the cursor
    Confirm,
    /// Pick the video under the cursor for saving into playlists
    Pick,
    /// Like or unlike the video being watched
    Like,
    /// Leave the video being watched
    Back,
}

impl Display for ListAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ListAction::Up => "Move up",
            ListAction::Down => "Move down",
            ListAction::Top => "Move to top",
            ListAction::Bottom => "Move to bottom",
            ListAction::Confirm => "Select",
            ListAction::Pick => "Save to playlist",
            ListAction::Like => "Like",
            ListAction::Back => "Back",
        })
    }
}
