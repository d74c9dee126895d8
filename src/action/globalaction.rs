use serde::{Deserialize, Serialize};
use strum::Display;

/// Keys that work on every page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum GlobalAction {
    Quit,
    /// Opens the command line
    Command,
    Undo,
    NextTab,
    PrevTab,
    Account,
    Feed,
    Playlists,
    Subscriptions,
    Search,
    Liked,
    /// Reloads the current page
    Refresh,
    /// Opens the form for a new playlist
    NewPlaylist,
    Logout,
    /// Drops a half typed key sequence
    EndKeySeq,
}
