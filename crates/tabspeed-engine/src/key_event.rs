use keychord::Chord;
use serde::{Deserialize, Serialize};

/// What kind of element a key event was aimed at. Only the distinction
/// between editable and non-editable targets matters to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTarget {
    /// Any non-editable element.
    #[default]
    Other,
    /// `<input>`, `<textarea>` or `<select>`.
    TextInput,
    /// An element inside a content-editable region.
    ContentEditable,
}

impl EventTarget {
    /// Whether typing into this target must be left alone.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::TextInput | Self::ContentEditable)
    }
}

/// A raw key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEvent {
    /// `KeyboardEvent.key`.
    pub key: String,
    /// Control held.
    #[serde(default)]
    pub ctrl: bool,
    /// Alt held.
    #[serde(default)]
    pub alt: bool,
    /// Shift held.
    #[serde(default)]
    pub shift: bool,
    /// Meta held.
    #[serde(default)]
    pub meta: bool,
    /// Event target kind.
    #[serde(default)]
    pub target: EventTarget,
}

impl KeyEvent {
    /// Event for `chord`, aimed at a non-editable target.
    pub fn from_chord(chord: &Chord) -> Self {
        use keychord::Modifier;
        Self {
            key: chord.key.as_str().to_string(),
            ctrl: chord.modifiers.contains(&Modifier::Ctrl),
            alt: chord.modifiers.contains(&Modifier::Alt),
            shift: chord.modifiers.contains(&Modifier::Shift),
            meta: chord.modifiers.contains(&Modifier::Meta),
            target: EventTarget::Other,
        }
    }

    /// Same event aimed at `target`.
    pub fn at(mut self, target: EventTarget) -> Self {
        self.target = target;
        self
    }

    /// Normalized key+modifier signature.
    pub fn chord(&self) -> Chord {
        Chord::from_event(&self.key, self.ctrl, self.alt, self.shift, self.meta)
    }
}

/// What the host should do with the event after the engine saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Let the page handle the event normally.
    Continue,
    /// Prevent the default action and stop further propagation.
    Suppress,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browser_event_json_normalizes() {
        let ev: KeyEvent =
            serde_json::from_str(r#"{"key":"S","shift":true,"target":"contentEditable"}"#)
                .expect("parse");
        assert!(ev.target.is_editable());
        assert_eq!(ev.chord(), Chord::parse("shift+s").expect("chord"));
    }

    #[test]
    fn from_chord_round_trips() {
        let chord = Chord::parse("ctrl+alt+arrowleft").expect("chord");
        let ev = KeyEvent::from_chord(&chord);
        assert!(!ev.target.is_editable());
        assert_eq!(ev.chord(), chord);
    }
}
