use serde::{Deserialize, Serialize};

// Every request sent to the query worker names the component its response belongs to. Several
// components may send the same kind of query (the playlist picker and the home component both ask
// for the current user, for example), and only the one that asked should act on the response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompID {
    Home,
    PlaylistPicker,
    Feed,
    Subscriptions,
    Search,
    Liked,
}
