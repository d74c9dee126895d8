use serde::Deserialize;

use crate::{action::localaction::ListAction, config::keybindings::KeyBindings};

/// Bindings that only apply to the focused page
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LocalKeyBinds {
    #[serde(default)]
    pub list: KeyBindings<ListAction>,
}
