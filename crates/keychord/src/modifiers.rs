use std::fmt;

use serde::{Deserialize, Serialize};

/// Modifier keys reported on keyboard events.
///
/// The declaration order is the canonical display order for chords.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    /// Control.
    Ctrl,
    /// Alt / Option.
    Alt,
    /// Shift.
    Shift,
    /// Meta / Command / Windows.
    Meta,
}

impl Modifier {
    /// Parse a modifier spec, case-insensitively, accepting common aliases
    /// (control, opt, option, cmd, command, super, win).
    pub fn from_spec(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::Ctrl),
            "alt" | "opt" | "option" => Some(Self::Alt),
            "shift" => Some(Self::Shift),
            "meta" | "cmd" | "command" | "super" | "win" => Some(Self::Meta),
            _ => None,
        }
    }

    /// Canonical lowercase spec for this modifier.
    pub fn to_spec(self) -> &'static str {
        match self {
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Shift => "shift",
            Self::Meta => "meta",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_spec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_specs() {
        assert_eq!(Modifier::from_spec("cmd"), Some(Modifier::Meta));
        assert_eq!(Modifier::from_spec("Control"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_spec("opt"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_spec("SHIFT"), Some(Modifier::Shift));
        assert_eq!(Modifier::from_spec("hyper"), None);
        assert_eq!(Modifier::Meta.to_spec(), "meta");
    }
}
