use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::{Error, Key, Modifier};

/// A key chord: a set of modifiers plus a single key.
///
/// Modifiers are held in an ordered set, so two chords built from the same
/// modifiers in any order compare equal.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Chord {
    /// Set of modifier keys held down for this chord.
    pub modifiers: BTreeSet<Modifier>,
    /// The non-modifier key for this chord.
    pub key: Key,
}

impl Chord {
    /// Parses a chord specification of the form "shift+alt+k".
    ///
    /// - Case-insensitive for both modifiers and the key.
    /// - Components are separated by "+"; the last component is always the key.
    /// - The "+" key itself is written as "plus" (a bare "+" is also accepted).
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.trim() == "+" {
            return Ok(Self::new(Key::new("+"), []));
        }
        let mut parts: Vec<&str> = s.split('+').collect();
        let key_raw = parts.pop().ok_or(Error::Empty)?;
        // A literal space key survives untrimmed.
        if key_raw.trim().is_empty() && key_raw != " " {
            return Err(if parts.is_empty() {
                Error::Empty
            } else {
                Error::Malformed(s.to_string())
            });
        }
        let mut modifiers = BTreeSet::new();
        for m in parts {
            if m.trim().is_empty() {
                return Err(Error::Malformed(s.to_string()));
            }
            let modifier = Modifier::from_spec(m).ok_or_else(|| Error::UnknownModifier {
                modifier: m.trim().to_string(),
                chord: s.to_string(),
            })?;
            modifiers.insert(modifier);
        }
        Ok(Self {
            modifiers,
            key: Key::new(key_raw),
        })
    }

    /// Build a chord from a key and modifiers.
    pub fn new(key: Key, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        Self {
            modifiers: modifiers.into_iter().collect(),
            key,
        }
    }

    /// Normalize a raw keyboard event (key identity plus modifier flags) into
    /// a chord comparable with parsed specs.
    pub fn from_event(key: &str, ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
        let flags = [
            (ctrl, Modifier::Ctrl),
            (alt, Modifier::Alt),
            (shift, Modifier::Shift),
            (meta, Modifier::Meta),
        ];
        Self::new(
            Key::new(key),
            flags.into_iter().filter_map(|(on, m)| on.then_some(m)),
        )
    }

    /// Returns the canonical string form of this chord: modifiers in
    /// canonical order followed by the key, joined with "+".
    pub fn to_string_canonical(&self) -> String {
        let mut out: Vec<String> = self
            .modifiers
            .iter()
            .map(|m| m.to_spec().to_string())
            .collect();
        out.push(self.key.to_spec());
        out.join("+")
    }
}

impl TryFrom<String> for Chord {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Chord> for String {
    fn from(c: Chord) -> Self {
        c.to_string_canonical()
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_chord() {
        let c = Chord::parse("shift+alt+k").expect("parse");
        assert!(c.modifiers.contains(&Modifier::Shift));
        assert!(c.modifiers.contains(&Modifier::Alt));
        assert_eq!(c.key, Key::new("k"));
        assert_eq!(c.to_string(), "alt+shift+k");
    }

    #[test]
    fn order_and_case_insensitive() {
        let a = Chord::parse("Shift+Ctrl+S").expect("parse");
        let b = Chord::parse("ctrl+shift+s").expect("parse");
        assert_eq!(a, b);
        let ev = Chord::from_event("S", true, false, true, false);
        assert_eq!(ev, a);
    }

    #[test]
    fn plus_and_space_keys() {
        assert_eq!(Chord::parse("+").expect("parse").key, Key::new("+"));
        let c = Chord::parse("ctrl+plus").expect("parse");
        assert_eq!(c.to_string(), "ctrl+plus");
        assert_eq!(Chord::parse("ctrl+plus"), Chord::parse(&c.to_string()));
        assert_eq!(Chord::parse(" ").expect("parse").key.as_str(), "space");
    }

    #[test]
    fn rejects_bad_specs() {
        assert!(matches!(
            Chord::parse("hyper+k"),
            Err(Error::UnknownModifier { .. })
        ));
        assert!(matches!(Chord::parse("ctrl++k"), Err(Error::Malformed(_))));
        assert_eq!(Chord::parse(""), Err(Error::Empty));
    }

    #[test]
    fn serde_uses_spec_strings() {
        let c = Chord::parse("meta+shift+?").expect("parse");
        let s: String = c.clone().into();
        assert_eq!(s, "shift+meta+?");
        assert_eq!(Chord::try_from(s).expect("reparse"), c);
    }
}
