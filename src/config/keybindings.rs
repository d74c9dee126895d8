use std::collections::HashMap;

use crossterm::event::KeyEvent;
use derive_deref::{Deref, DerefMut};
use serde::{de::DeserializeOwned, de::Error, Deserialize, Deserializer};

use crate::config::keyparser::KeyParser;

#[derive(Clone, Debug, Deref, DerefMut)]
pub struct KeyBindings<T>(pub HashMap<Vec<KeyEvent>, T>);

impl<T> Default for KeyBindings<T> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for KeyBindings<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, T>::deserialize(deserializer)?;
        let keybindings = parsed_map
            .into_iter()
            .map(|(keyseq, action)| {
                KeyParser::parse_key_sequence(&keyseq).map(|keyseq| (keyseq, action))
            })
            .collect::<Result<HashMap<_, _>, String>>()
            .map_err(D::Error::custom)?;
        Ok(KeyBindings(keybindings))
    }
}

impl<T: PartialEq + Clone> KeyBindings<T> {
    /// Shortest key sequence bound to the action
    pub fn find_action(&self, action: &T) -> Option<Vec<KeyEvent>> {
        self.0
            .iter()
            .filter(|(_, val)| *val == action)
            .map(|(key, _)| key.clone())
            .min_by_key(|key| {
                let written = KeyParser::keyseq_to_string(key);
                (key.len(), written.len(), written)
            })
    }

    pub fn find_action_str(&self, action: &T) -> Option<String> {
        self.find_action(action)
            .map(|keyseq| KeyParser::keyseq_to_string(&keyseq))
    }
}
