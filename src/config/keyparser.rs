use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyParser {}

impl KeyParser {
    pub fn key_event_to_string(key_event: &KeyEvent) -> String {
        let char;
        let key_code = match key_event.code {
            KeyCode::Backspace => "Backspace",
            KeyCode::Enter => "Enter",
            KeyCode::Left => "Left",
            KeyCode::Right => "Right",
            KeyCode::Up => "Up",
            KeyCode::Down => "Down",
            KeyCode::Home => "Home",
            KeyCode::End => "End",
            KeyCode::PageUp => "PageUp",
            KeyCode::PageDown => "PageDown",
            KeyCode::Tab => "Tab",
            KeyCode::BackTab => "Backtab",
            KeyCode::Delete => "Delete",
            KeyCode::Insert => "Insert",
            KeyCode::F(c) => {
                char = format!("f({c})");
                &char
            }
            KeyCode::Char(' ') => "Space",
            KeyCode::Char(c) => {
                char = c.to_string();
                &char
            }
            KeyCode::Esc => "Esc",
            _ => "",
        };

        let mut modifiers = Vec::with_capacity(3);
        if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
            modifiers.push("Ctrl");
        }
        // An upper case letter already says it
        if key_event.modifiers.intersects(KeyModifiers::SHIFT)
            && !matches!(key_event.code, KeyCode::Char(_) | KeyCode::BackTab)
        {
            modifiers.push("Shift");
        }
        if key_event.modifiers.intersects(KeyModifiers::ALT) {
            modifiers.push("Alt");
        }

        let mut key = modifiers.join("-");
        if !key.is_empty() {
            key.push('-');
        }
        key.push_str(key_code);
        key
    }

    /// Formats a key sequence the way it is written in the config, e.g. `<g><g>`
    pub fn keyseq_to_string(keyseq: &[KeyEvent]) -> String {
        keyseq
            .iter()
            .map(|k| format!("<{}>", Self::key_event_to_string(k)))
            .collect()
    }

    /// Terminals disagree on whether a typed symbol such as `:` comes with SHIFT. Letters keep the
    /// modifier, every other character drops it. Kind and state are reset so that events compare
    /// by key alone.
    pub fn normalize(key: KeyEvent) -> KeyEvent {
        let mut modifiers = key.modifiers;
        if let KeyCode::Char(c) = key.code {
            if c.is_ascii_uppercase() {
                modifiers.insert(KeyModifiers::SHIFT);
            } else if !c.is_alphabetic() {
                modifiers.remove(KeyModifiers::SHIFT);
            }
        }
        KeyEvent::new(key.code, modifiers)
    }

    fn parse_key_code_with_modifiers(
        raw: &str,
        mut modifiers: KeyModifiers,
    ) -> Result<KeyEvent, String> {
        let c = match raw {
            "esc" => KeyCode::Esc,
            "enter" => KeyCode::Enter,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" => KeyCode::PageUp,
            "pagedown" => KeyCode::PageDown,
            "backtab" => {
                modifiers.insert(KeyModifiers::SHIFT);
                KeyCode::BackTab
            }
            "backspace" => KeyCode::Backspace,
            "delete" => KeyCode::Delete,
            "insert" => KeyCode::Insert,
            "space" => KeyCode::Char(' '),
            "hyphen" | "minus" => KeyCode::Char('-'),
            "tab" => KeyCode::Tab,
            f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
                Ok(n) if (1..=12).contains(&n) => KeyCode::F(n),
                _ => return Err(format!("Unable to parse {raw}")),
            },
            c => {
                let mut chars = c.chars();
                match (chars.next(), chars.next()) {
                    (Some(mut c), None) => {
                        if modifiers.contains(KeyModifiers::SHIFT) {
                            c = c.to_ascii_uppercase();
                        }
                        KeyCode::Char(c)
                    }
                    _ => return Err(format!("Unable to parse {raw}")),
                }
            }
        };
        Ok(Self::normalize(KeyEvent::new(c, modifiers)))
    }

    fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
        let mut modifiers = KeyModifiers::empty();
        let mut current = raw;

        loop {
            match current {
                rest if rest.starts_with("ctrl-") => {
                    modifiers.insert(KeyModifiers::CONTROL);
                    current = &rest[5..];
                }
                rest if rest.starts_with("alt-") => {
                    modifiers.insert(KeyModifiers::ALT);
                    current = &rest[4..];
                }
                rest if rest.starts_with("shift-") => {
                    modifiers.insert(KeyModifiers::SHIFT);
                    current = &rest[6..];
                }
                _ => break,
            };
        }

        (current, modifiers)
    }

    pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
        let raw_lower = raw.to_ascii_lowercase();
        let (remaining, modifiers) = Self::extract_modifiers(&raw_lower);
        Self::parse_key_code_with_modifiers(remaining, modifiers)
    }

    /// Parses `<ctrl-x><g>` style sequences. A single key may leave out the brackets.
    pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
        if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
            return Err(format!("Unable to parse `{}`", raw));
        }
        let raw = if !raw.contains("><") {
            let raw = raw.strip_prefix('<').unwrap_or(raw);
            raw.strip_suffix('>').unwrap_or(raw)
        } else {
            raw
        };
        let sequences = raw
            .split("><")
            .map(|seq| {
                if let Some(s) = seq.strip_prefix('<') {
                    s
                } else if let Some(s) = seq.strip_suffix('>') {
                    s
                } else {
                    seq
                }
            })
            .collect::<Vec<_>>();

        sequences.into_iter().map(Self::parse_key_event).collect()
    }
}
