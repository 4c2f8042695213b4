use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::config::ConfigError;

/// Global actions a key chord can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Advance focus to the next ring slot.
    Next,
    /// Retreat focus to the previous ring slot.
    Prev,
    /// Commit the focused field.
    Confirm,
    /// Remove the entry named by the focused key/value group.
    Delete,
    /// Toggle the focused checkbox (or cycle the focused select).
    ToggleCheckbox,
    /// Send the request.
    Send,
    Quit,
    Help,
    PageUp,
    PageDown,
    FullScreen,
    SaveSession,
    LoadSession,
    /// Fill the focused field from its suggestion list.
    Autocomplete,
}

impl Action {
    pub const ALL: [Action; 14] = [
        Action::Next,
        Action::Prev,
        Action::Confirm,
        Action::Delete,
        Action::ToggleCheckbox,
        Action::Send,
        Action::Quit,
        Action::Help,
        Action::PageUp,
        Action::PageDown,
        Action::FullScreen,
        Action::SaveSession,
        Action::LoadSession,
        Action::Autocomplete,
    ];

    /// Name used in the `[keys]` config table.
    pub fn config_name(self) -> &'static str {
        match self {
            Action::Next => "next",
            Action::Prev => "prev",
            Action::Confirm => "confirm",
            Action::Delete => "delete",
            Action::ToggleCheckbox => "toggle",
            Action::Send => "send",
            Action::Quit => "quit",
            Action::Help => "help",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::FullScreen => "fullscreen",
            Action::SaveSession => "save_session",
            Action::LoadSession => "load_session",
            Action::Autocomplete => "autocomplete",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.config_name() == name)
    }

    /// Human-readable description for the help overlay.
    pub fn description(self) -> &'static str {
        match self {
            Action::Next => "Next field / commit method",
            Action::Prev => "Previous field",
            Action::Confirm => "Set value",
            Action::Delete => "Delete header / param / cookie / form field",
            Action::ToggleCheckbox => "Toggle checkbox / cycle option",
            Action::Send => "Send request",
            Action::Quit => "Quit",
            Action::Help => "Toggle help",
            Action::PageUp => "Scroll response up",
            Action::PageDown => "Scroll response down",
            Action::FullScreen => "Toggle full screen",
            Action::SaveSession => "Save session",
            Action::LoadSession => "Load session",
            Action::Autocomplete => "Autocomplete from suggestions",
        }
    }
}

/// A single key combination such as `ctrl+g` or `shift+tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyChord {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }.normalized()
    }

    /// Build the chord a terminal key event corresponds to.
    pub fn from_event(key: &KeyEvent) -> Self {
        Self::new(key.code, key.modifiers)
    }

    // Terminals report shift+tab as BackTab, with or without SHIFT, and
    // uppercase chars with SHIFT set. Collapse those spellings.
    fn normalized(mut self) -> Self {
        match self.code {
            KeyCode::BackTab => self.modifiers.remove(KeyModifiers::SHIFT),
            KeyCode::Tab if self.modifiers.contains(KeyModifiers::SHIFT) => {
                self.code = KeyCode::BackTab;
                self.modifiers.remove(KeyModifiers::SHIFT);
            }
            KeyCode::Char(c) if c.is_ascii_uppercase() => {
                self.modifiers.remove(KeyModifiers::SHIFT);
            }
            _ => {}
        }
        self.modifiers &= KeyModifiers::SHIFT | KeyModifiers::CONTROL | KeyModifiers::ALT;
        self
    }
}

impl FromStr for KeyChord {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidKey(s.to_string());
        let lower = s.trim().to_ascii_lowercase();
        if lower.is_empty() {
            return Err(invalid());
        }

        let mut modifiers = KeyModifiers::NONE;
        let mut parts: Vec<&str> = lower.split('+').collect();
        // "ctrl++" style chords bind the plus key itself.
        let key = if lower.ends_with("++") {
            parts.truncate(parts.len().saturating_sub(2));
            "+"
        } else {
            parts.pop().ok_or_else(invalid)?
        };
        for part in parts {
            match part {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(invalid()),
            }
        }

        let code = match key {
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "esc" | "escape" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "insert" => KeyCode::Insert,
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pagedown" => KeyCode::PageDown,
            f if f.starts_with('f') && f.len() > 1 => {
                let n: u8 = f[1..].parse().map_err(|_| invalid())?;
                KeyCode::F(n)
            }
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return Err(invalid()),
                }
            }
        };

        Ok(KeyChord::new(code, modifiers))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("shift+")?;
        }
        match self.code {
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("delete"),
            KeyCode::Insert => f.write_str("insert"),
            KeyCode::Up => f.write_str("up"),
            KeyCode::Down => f.write_str("down"),
            KeyCode::Left => f.write_str("left"),
            KeyCode::Right => f.write_str("right"),
            KeyCode::Home => f.write_str("home"),
            KeyCode::End => f.write_str("end"),
            KeyCode::PageUp => f.write_str("pgup"),
            KeyCode::PageDown => f.write_str("pgdown"),
            KeyCode::F(n) => write!(f, "f{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Bindings from key chords to actions.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: BTreeMap<Action, Vec<KeyChord>>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a key map from the `[keys]` config table.
    pub fn from_table(table: &BTreeMap<String, Vec<String>>) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        for (name, chords) in table {
            let action = Action::from_config_name(name)
                .ok_or_else(|| ConfigError::UnknownAction(name.clone()))?;
            for chord in chords {
                map.bind(action, chord.parse()?);
            }
        }
        Ok(map)
    }

    pub fn bind(&mut self, action: Action, chord: KeyChord) {
        let chords = self.bindings.entry(action).or_default();
        if !chords.contains(&chord) {
            chords.push(chord);
        }
    }

    /// The action bound to this key event, if any.
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        let chord = KeyChord::from_event(key);
        self.bindings
            .iter()
            .find(|(_, chords)| chords.contains(&chord))
            .map(|(action, _)| *action)
    }

    pub fn chords(&self, action: Action) -> &[KeyChord] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Chords of `action` joined for display, e.g. `"ctrl+q / ctrl+c"`.
    pub fn label(&self, action: Action) -> String {
        self.chords(action)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_parse_chords() {
        let chord: KeyChord = "ctrl+g".parse().unwrap();
        assert_eq!(chord, KeyChord::new(KeyCode::Char('g'), KeyModifiers::CONTROL));

        let chord: KeyChord = "Shift+Tab".parse().unwrap();
        assert_eq!(chord, KeyChord::new(KeyCode::BackTab, KeyModifiers::NONE));

        let chord: KeyChord = "pgdown".parse().unwrap();
        assert_eq!(chord.code, KeyCode::PageDown);

        let chord: KeyChord = "f1".parse().unwrap();
        assert_eq!(chord.code, KeyCode::F(1));

        let chord: KeyChord = "space".parse().unwrap();
        assert_eq!(chord.code, KeyCode::Char(' '));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<KeyChord>().is_err());
        assert!("hyper+x".parse::<KeyChord>().is_err());
        assert!("ctrl+nope".parse::<KeyChord>().is_err());
        assert!("fx".parse::<KeyChord>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for s in ["ctrl+g", "shift+tab", "pgup", "enter", "space", "alt+x"] {
            let chord: KeyChord = s.parse().unwrap();
            assert_eq!(chord.to_string(), s);
            assert_eq!(chord.to_string().parse::<KeyChord>().unwrap(), chord);
        }
    }

    #[test]
    fn test_resolve_matches_terminal_events() {
        let mut table = BTreeMap::new();
        table.insert("prev".to_string(), vec!["shift+tab".to_string()]);
        table.insert("send".to_string(), vec!["ctrl+g".to_string()]);
        table.insert(
            "quit".to_string(),
            vec!["ctrl+q".to_string(), "ctrl+c".to_string()],
        );
        let map = KeyMap::from_table(&table).unwrap();

        assert_eq!(
            map.resolve(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(Action::Prev)
        );
        assert_eq!(
            map.resolve(&key(KeyCode::Char('g'), KeyModifiers::CONTROL)),
            Some(Action::Send)
        );
        assert_eq!(
            map.resolve(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(map.resolve(&key(KeyCode::Char('g'), KeyModifiers::NONE)), None);
        assert_eq!(map.label(Action::Quit), "ctrl+q / ctrl+c");
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let mut table = BTreeMap::new();
        table.insert("launch".to_string(), vec!["ctrl+l".to_string()]);
        assert!(matches!(
            KeyMap::from_table(&table),
            Err(ConfigError::UnknownAction(name)) if name == "launch"
        ));
    }
}
