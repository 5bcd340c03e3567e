//! Hotkey bindings.

use keychord::Chord;
use serde::{Deserialize, Serialize};

use crate::{Command, defaults};

/// A hotkey binding: a trigger chord mapped to a command.
///
/// Everything here is declarative user configuration except
/// `cycle_increment`, the one field the runtime mutates: it remembers the
/// position of a cycling command between invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keybind {
    /// Stable identifier, unique within a configuration.
    pub id: String,
    /// Disabled bindings never match.
    #[serde(default = "defaults::default_true")]
    pub enabled: bool,
    /// Key plus modifiers that fires the binding.
    pub trigger: Chord,
    /// What the binding does.
    pub command: Command,
    /// Only match while at least one media element is tracked.
    #[serde(default)]
    pub if_media: bool,
    /// Match in the capture phase and suppress the page's own handling.
    #[serde(default)]
    pub greedy: bool,
    /// Position counter for `cycleFilterValue`; unset until first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_increment: Option<u32>,
}

impl Keybind {
    /// Build an enabled, non-greedy binding.
    pub fn new(id: impl Into<String>, trigger: Chord, command: Command) -> Self {
        Self {
            id: id.into(),
            enabled: true,
            trigger,
            command,
            if_media: false,
            greedy: false,
            cycle_increment: None,
        }
    }

    /// Builder-style greedy flag.
    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    /// Builder-style media guard.
    pub fn if_media(mut self, if_media: bool) -> Self {
        self.if_media = if_media;
        self
    }
}
