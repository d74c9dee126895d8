use crossterm::event::KeyEvent;

use crate::{
    action::Action, components::traits::renderable::Renderable, config::keybindings::KeyBindings,
};

#[derive(Debug, Clone, PartialEq)]
pub enum KeySeqResult {
    NoActionNeeded,
    ActionNeeded(Action),
}

pub trait HandleKeySeq<T: PartialEq + Clone>: Renderable {
    /// Optionally, a component may have a set of subcomponents that has keybinds. This function is
    /// called just before the key sequence is matched against this component's keybinding. If this
    /// function returns something other than None, it means that the key sequence matched against
    /// something in the subcomponent, and this component should not override that.
    fn pass_to_lower_comp(&mut self, keyseq: &[KeyEvent]) -> Option<KeySeqResult> {
        let _ = keyseq;
        None
    }

    fn handle_local_action(&mut self, action: T) -> KeySeqResult;

    fn get_keybinds(&self) -> &KeyBindings<T>;

    fn handle_key_seq(&mut self, keyseq: &[KeyEvent]) -> Option<KeySeqResult> {
        if let Some(res) = self.pass_to_lower_comp(keyseq) {
            Some(res)
        } else if let Some(res) = self.get_keybinds().get(keyseq) {
            Some(self.handle_local_action(res.clone()))
        } else {
            None
        }
    }
}
