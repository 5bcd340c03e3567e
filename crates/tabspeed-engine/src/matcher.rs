//! Hotkey matching for the two keyboard passes.

use config::Keybind;
use tracing::trace;

use crate::key_event::KeyEvent;

/// Which keyboard pass is matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Capture phase: greedy bindings only.
    Greedy,
    /// Bubble phase: every binding.
    Normal,
}

/// Runtime facts a match depends on besides the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchState {
    /// Whether the system is enabled for the tab.
    pub enabled: bool,
    /// Whether at least one media element is tracked.
    pub has_media: bool,
}

/// Indices of the bindings matching `event` in `pass`, in binding order.
///
/// A binding matches when it is enabled, its trigger equals the event's
/// normalized chord, and its media guard (if any) is satisfied. While the
/// system is disabled only state-toggle bindings are considered. Events aimed
/// at editable targets never match.
pub fn matching(bindings: &[Keybind], event: &KeyEvent, pass: Pass, state: MatchState) -> Vec<usize> {
    if event.target.is_editable() {
        trace!(key = %event.key, "editable target, ignoring");
        return Vec::new();
    }
    let chord = event.chord();
    bindings
        .iter()
        .enumerate()
        .filter(|(_, kb)| kb.enabled)
        .filter(|(_, kb)| pass == Pass::Normal || kb.greedy)
        .filter(|(_, kb)| state.enabled || kb.command.is_state_toggle())
        .filter(|(_, kb)| kb.trigger == chord)
        .filter(|(_, kb)| !kb.if_media || state.has_media)
        .map(|(i, kb)| {
            trace!(pass = ?pass, id = %kb.id, chord = %chord, "binding_matched");
            i
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use config::{Command, Toggle};
    use keychord::Chord;

    use super::*;
    use crate::key_event::EventTarget;

    fn kb(id: &str, spec: &str, command: Command) -> Keybind {
        Keybind::new(id, Chord::parse(spec).expect("chord"), command)
    }

    fn ev(spec: &str) -> KeyEvent {
        KeyEvent::from_chord(&Chord::parse(spec).expect("chord"))
    }

    const ON: MatchState = MatchState {
        enabled: true,
        has_media: true,
    };

    #[test]
    fn all_matches_in_binding_order() {
        let binds = vec![
            kb("a", "d", Command::AdjustSpeed { value: None }),
            kb("b", "s", Command::Nothing),
            kb("c", "D", Command::SetSpeed { value: None }),
        ];
        assert_eq!(matching(&binds, &ev("d"), Pass::Normal, ON), vec![0, 2]);
    }

    #[test]
    fn modifiers_order_and_case_insensitive() {
        let binds = vec![kb("a", "shift+ctrl+k", Command::Nothing)];
        let event = KeyEvent {
            key: "K".into(),
            ctrl: true,
            shift: true,
            ..KeyEvent::default()
        };
        assert_eq!(matching(&binds, &event, Pass::Normal, ON), vec![0]);
        assert!(matching(&binds, &ev("ctrl+k"), Pass::Normal, ON).is_empty());
    }

    #[test]
    fn disabled_binding_never_matches() {
        let mut b = kb("a", "d", Command::Nothing);
        b.enabled = false;
        assert!(matching(&[b], &ev("d"), Pass::Normal, ON).is_empty());
    }

    #[test]
    fn greedy_pass_only_sees_greedy_bindings() {
        let binds = vec![
            kb("a", "d", Command::Nothing),
            kb("b", "d", Command::Nothing).greedy(true),
        ];
        assert_eq!(matching(&binds, &ev("d"), Pass::Greedy, ON), vec![1]);
        assert_eq!(matching(&binds, &ev("d"), Pass::Normal, ON), vec![0, 1]);
    }

    #[test]
    fn disabled_system_only_allows_state_toggle() {
        let binds = vec![
            kb("speed", "d", Command::AdjustSpeed { value: None }).greedy(true),
            kb("state", "d", Command::SetState { state: Toggle::Toggle }).greedy(true),
        ];
        let off = MatchState {
            enabled: false,
            has_media: true,
        };
        assert_eq!(matching(&binds, &ev("d"), Pass::Normal, off), vec![1]);
        assert_eq!(matching(&binds, &ev("d"), Pass::Greedy, off), vec![1]);
    }

    #[test]
    fn media_guard_requires_tracked_media() {
        let binds = vec![kb("seek", "x", Command::Seek { value: None }).if_media(true)];
        let no_media = MatchState {
            enabled: true,
            has_media: false,
        };
        assert!(matching(&binds, &ev("x"), Pass::Normal, no_media).is_empty());
        assert_eq!(matching(&binds, &ev("x"), Pass::Normal, ON), vec![0]);
    }

    #[test]
    fn editable_targets_are_ignored_in_both_passes() {
        let binds = vec![kb("a", "d", Command::Nothing).greedy(true)];
        for target in [EventTarget::TextInput, EventTarget::ContentEditable] {
            let event = ev("d").at(target);
            assert!(matching(&binds, &event, Pass::Greedy, ON).is_empty());
            assert!(matching(&binds, &event, Pass::Normal, ON).is_empty());
        }
    }
}
