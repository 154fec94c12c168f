//! Keyboard mapping for the code editor.
//!
//! Only a handful of combinations mean something beyond "type this": the run
//! keys, undo/redo, indent and select-all. Everything else falls through to
//! plain text input.

use std::collections::HashMap;

use crate::config::EditorConfig;

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool, // Cmd on macOS, Win on Windows
}

impl Modifiers {
    /// No modifiers pressed.
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl modifier.
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Shift modifier.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    /// Meta (Cmd/Win) modifier.
    pub const META: Modifiers = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };

    /// Ctrl+Shift.
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    /// Meta+Shift.
    pub const META_SHIFT: Modifiers = Modifiers {
        meta: true,
        shift: true,
        ..Modifiers::NONE
    };

    /// Returns true if no modifiers are pressed.
    pub fn is_empty(&self) -> bool {
        !self.ctrl && !self.alt && !self.shift && !self.meta
    }

    /// Returns true if a text-producing key should still type (Shift alone).
    pub fn is_typing(&self) -> bool {
        !self.ctrl && !self.alt && !self.meta
    }

    /// Parses modifiers from a string like "ctrl+shift".
    pub fn parse(s: &str) -> Self {
        let mut mods = Modifiers::NONE;
        let lower = s.to_lowercase();
        if lower.contains("ctrl") || lower.contains("control") {
            mods.ctrl = true;
        }
        if lower.contains("alt") || lower.contains("option") {
            mods.alt = true;
        }
        if lower.contains("shift") {
            mods.shift = true;
        }
        if lower.contains("meta") || lower.contains("cmd") || lower.contains("win") {
            mods.meta = true;
        }
        mods
    }
}

impl std::fmt::Display for Modifiers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.alt {
            parts.push("Alt");
        }
        if self.shift {
            parts.push("Shift");
        }
        if self.meta {
            #[cfg(target_os = "macos")]
            parts.push("Cmd");
            #[cfg(not(target_os = "macos"))]
            parts.push("Win");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    Left,
    Right,
    Home,
    End,
    Space,
}

impl Key {
    /// Parses a key from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.as_str() {
            "enter" | "return" => Some(Key::Enter),
            "tab" => Some(Key::Tab),
            "backspace" | "bs" => Some(Key::Backspace),
            "delete" | "del" => Some(Key::Delete),
            "escape" | "esc" => Some(Key::Escape),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            "home" => Some(Key::Home),
            "end" => Some(Key::End),
            "space" => Some(Key::Space),
            _ => {
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c.to_uppercase()),
            Key::Enter => write!(f, "Enter"),
            Key::Tab => write!(f, "Tab"),
            Key::Backspace => write!(f, "Backspace"),
            Key::Delete => write!(f, "Delete"),
            Key::Escape => write!(f, "Escape"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
            Key::Home => write!(f, "Home"),
            Key::End => write!(f, "End"),
            Key::Space => write!(f, "Space"),
        }
    }
}

/// A key press event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyPress {
    /// Creates a new key press.
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Parses a key binding string like "Shift+Enter".
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let (key_str, mods) = parts.split_last()?;
        let key = Key::parse(key_str)?;
        let modifiers = Modifiers::parse(&mods.join("+"));

        Some(Self { key, modifiers })
    }
}

impl std::fmt::Display for KeyPress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifiers.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifiers, self.key)
        }
    }
}

/// What a bound key combination does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Run,
    Undo,
    Redo,
    Indent,
    SelectAll,
}

/// Key combination to action lookup.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<KeyPress, EditorAction>,
}

impl Keymap {
    /// Creates a keymap with default bindings.
    pub fn new() -> Self {
        Self::with_run_keys(&["Shift+Enter", "Ctrl+Enter"])
    }

    /// Creates a keymap from configuration.
    ///
    /// Unparseable run keys are skipped with a warning; if none survive,
    /// the defaults are used.
    pub fn from_config(config: &EditorConfig) -> Self {
        let keys: Vec<&str> = config.run_keys.iter().map(String::as_str).collect();
        let keymap = Self::with_run_keys(&keys);
        if keymap.run_keys().is_empty() {
            tracing::warn!("No usable run keys configured, using defaults");
            return Self::new();
        }
        keymap
    }

    fn with_run_keys(run_keys: &[&str]) -> Self {
        use EditorAction::*;

        let mut bindings = HashMap::new();
        for (mods, key, action) in [
            (Modifiers::CTRL, 'z', Undo),
            (Modifiers::META, 'z', Undo),
            (Modifiers::CTRL, 'y', Redo),
            (Modifiers::CTRL_SHIFT, 'z', Redo),
            (Modifiers::META_SHIFT, 'z', Redo),
            (Modifiers::CTRL, 'a', SelectAll),
            (Modifiers::META, 'a', SelectAll),
        ] {
            bindings.insert(KeyPress::new(Key::Char(key), mods), action);
        }
        bindings.insert(KeyPress::plain(Key::Tab), Indent);

        for key_str in run_keys {
            match KeyPress::parse(key_str) {
                Some(key) => {
                    bindings.insert(key, Run);
                }
                None => tracing::warn!("Ignoring invalid run key: {}", key_str),
            }
        }

        Self { bindings }
    }

    /// Looks up the action for a key press.
    pub fn action(&self, key: &KeyPress) -> Option<EditorAction> {
        let normalized = key.normalized();
        self.bindings.get(&normalized).copied()
    }

    /// Key combinations bound to `Run`, for hints in the UI.
    pub fn run_keys(&self) -> Vec<&KeyPress> {
        let mut keys: Vec<&KeyPress> = self
            .bindings
            .iter()
            .filter(|(_, action)| **action == EditorAction::Run)
            .map(|(key, _)| key)
            .collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyPress {
    /// Lowercases letter keys so Shift+Z and Shift+z look the same.
    fn normalized(&self) -> KeyPress {
        match self.key {
            Key::Char(c) => KeyPress::new(Key::Char(c.to_ascii_lowercase()), self.modifiers),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypress_parse() {
        let key = KeyPress::parse("Shift+Enter").unwrap();
        assert_eq!(key.key, Key::Enter);
        assert!(key.modifiers.shift);
        assert!(!key.modifiers.ctrl);

        let key = KeyPress::parse("ctrl+shift+z").unwrap();
        assert_eq!(key, KeyPress::new(Key::Char('z'), Modifiers::CTRL_SHIFT));

        assert!(KeyPress::parse("Ctrl+Nope").is_none());
    }

    #[test]
    fn test_keypress_display() {
        assert_eq!(KeyPress::new(Key::Enter, Modifiers::SHIFT).to_string(), "Shift+Enter");
        assert_eq!(KeyPress::plain(Key::Tab).to_string(), "Tab");
    }

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::new();
        assert_eq!(
            keymap.action(&KeyPress::new(Key::Enter, Modifiers::SHIFT)),
            Some(EditorAction::Run)
        );
        assert_eq!(
            keymap.action(&KeyPress::new(Key::Enter, Modifiers::CTRL)),
            Some(EditorAction::Run)
        );
        assert_eq!(
            keymap.action(&KeyPress::new(Key::Char('Z'), Modifiers::CTRL_SHIFT)),
            Some(EditorAction::Redo)
        );
        assert_eq!(keymap.action(&KeyPress::plain(Key::Enter)), None);
        assert_eq!(keymap.run_keys().len(), 2);
    }

    #[test]
    fn test_configured_run_keys() {
        let config = EditorConfig {
            run_keys: vec!["Alt+R".to_string(), "bogus+".to_string()],
            ..EditorConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        let alt_r = KeyPress::new(
            Key::Char('r'),
            Modifiers {
                alt: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(keymap.action(&alt_r), Some(EditorAction::Run));
        assert_eq!(keymap.action(&KeyPress::new(Key::Enter, Modifiers::SHIFT)), None);
    }

    #[test]
    fn test_no_usable_run_keys_falls_back() {
        let config = EditorConfig {
            run_keys: vec![String::new()],
            ..EditorConfig::default()
        };
        let keymap = Keymap::from_config(&config);
        assert_eq!(keymap.run_keys().len(), 2);
    }
}
