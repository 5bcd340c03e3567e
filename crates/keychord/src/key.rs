use std::fmt;

use serde::{Deserialize, Serialize};

/// Aliases accepted when parsing specs and events. Left side is the alias,
/// right side the canonical spelling. Canonical names follow the DOM
/// `KeyboardEvent.key` values, lowercased.
const KEY_ALIASES: &[(&str, &str)] = &[
    (" ", "space"),
    ("spacebar", "space"),
    ("esc", "escape"),
    ("ret", "enter"),
    ("return", "enter"),
    ("del", "delete"),
    ("bksp", "backspace"),
    ("left", "arrowleft"),
    ("right", "arrowright"),
    ("up", "arrowup"),
    ("down", "arrowdown"),
    ("pgup", "pageup"),
    ("pgdn", "pagedown"),
    ("plus", "+"),
    ("comma", ","),
    ("period", "."),
    ("slash", "/"),
    ("minus", "-"),
    ("equal", "="),
    ("semicolon", ";"),
    ("quote", "'"),
    ("grave", "`"),
    ("backslash", "\\"),
];

/// A normalized, non-modifier key identity.
///
/// Keys are stored lowercased with aliases folded, so `Key::new("A")`,
/// `Key::new("a")` compare equal and `Key::new("Esc")` equals
/// `Key::new("Escape")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Key(String);

impl Key {
    /// Normalize a key spec or a raw event key.
    pub fn new(raw: &str) -> Self {
        // A literal space is meaningful; anything else is trimmed.
        let text = if raw == " " { raw } else { raw.trim() };
        let lower = text.to_lowercase();
        let canonical = KEY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map(|(_, name)| (*name).to_string())
            .unwrap_or(lower);
        Self(canonical)
    }

    /// The canonical spec spelling of this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical spelling safe to embed in a chord spec.
    pub(crate) fn to_spec(&self) -> String {
        match self.0.as_str() {
            "+" => "plus".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<Key> for String {
    fn from(k: Key) -> Self {
        k.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_and_aliases_fold() {
        assert_eq!(Key::new("A"), Key::new("a"));
        assert_eq!(Key::new("Esc"), Key::new("Escape"));
        assert_eq!(Key::new(" ").as_str(), "space");
        assert_eq!(Key::new("ArrowLeft"), Key::new("left"));
    }

    #[test]
    fn plus_spec_is_spelled_out() {
        assert_eq!(Key::new("+").to_spec(), "plus");
        assert_eq!(Key::new("plus").as_str(), "+");
    }
}
