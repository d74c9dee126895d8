use color_eyre::Result;

use crate::{action::Action, components::traits::renderable::Renderable};

/// The root of the component tree. Every action goes through here.
pub trait Component: Renderable {
    /// Update the state of the component based on a received action.
    ///
    /// # Returns
    ///
    /// * `Result<Option<Action>>` - An action to be processed next, or none.
    fn update(&mut self, action: Action) -> Result<Option<Action>>;
}
