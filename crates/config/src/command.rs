//! The closed command vocabulary bound to hotkeys.

use serde::{Deserialize, Serialize};

use crate::FilterId;

/// Tri-state switch used by on/off commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// Force on.
    On,
    /// Force off.
    Off,
    /// Invert the current value.
    #[default]
    Toggle,
}

impl Toggle {
    /// Resolve against the current value.
    pub fn apply(self, current: bool) -> bool {
        match self {
            Self::On => true,
            Self::Off => false,
            Self::Toggle => !current,
        }
    }
}

/// Which filter value set(s) a filter command addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterTarget {
    /// Filters applied to tracked elements.
    #[default]
    Element,
    /// Filters applied to the page backdrop.
    Backdrop,
    /// Both sets.
    Both,
}

impl FilterTarget {
    /// Whether the element set is addressed.
    pub fn element(self) -> bool {
        matches!(self, Self::Element | Self::Both)
    }

    /// Whether the backdrop set is addressed.
    pub fn backdrop(self) -> bool {
        matches!(self, Self::Backdrop | Self::Both)
    }
}

/// Commands a keybind can trigger, with their parameters.
///
/// Serialized internally tagged by `kind`, e.g.
/// `{"kind": "adjustSpeed", "value": 0.1}`. Unknown kinds fail to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    /// Placeholder binding; does nothing.
    Nothing,
    /// Add `value` (default 0.1) to the speed.
    AdjustSpeed {
        /// Signed delta.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Set the speed to `value` (default 1.0).
    SetSpeed {
        /// Target speed.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Pin or unpin the current tab.
    SetPin {
        /// Desired pin state.
        #[serde(default)]
        state: Toggle,
    },
    /// Enable or disable the system for the current tab.
    SetState {
        /// Desired enabled state.
        #[serde(default)]
        state: Toggle,
    },
    /// Seek tracked media by `value` seconds (default 10).
    Seek {
        /// Signed offset in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Pause or resume tracked media.
    SetPause {
        /// Desired paused state.
        #[serde(default)]
        state: Toggle,
    },
    /// Mute or unmute tracked media.
    SetMute {
        /// Desired muted state.
        #[serde(default)]
        state: Toggle,
    },
    /// Bookmark the current position of tracked media under `key`.
    SetMark {
        /// Mark name.
        key: String,
    },
    /// Jump to the bookmark `key`, setting it first if it does not exist.
    SeekMark {
        /// Mark name.
        key: String,
    },
    /// Open `url` in a new tab.
    OpenUrl {
        /// Address to open.
        url: String,
    },
    /// Enable or disable filter effects.
    SetFx {
        /// Addressed value set(s).
        #[serde(default)]
        target: FilterTarget,
        /// Desired enabled state.
        #[serde(default)]
        state: Toggle,
    },
    /// Restore filter values to catalog defaults.
    ResetFx {
        /// Addressed value set(s).
        #[serde(default)]
        target: FilterTarget,
    },
    /// Swap element and backdrop effects wholesale.
    FlipFx,
    /// Add `value` (default: the filter's large step) to a filter.
    AdjustFilter {
        /// Addressed value set(s).
        #[serde(default)]
        target: FilterTarget,
        /// Filter to change.
        filter: FilterId,
        /// Signed delta.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Set a filter to `value` (default: the filter's default).
    SetFilter {
        /// Addressed value set(s).
        #[serde(default)]
        target: FilterTarget,
        /// Filter to change.
        filter: FilterId,
        /// Target value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
    /// Step a filter through `cycle` (default `[0, 1]`) on each invocation.
    CycleFilterValue {
        /// Addressed value set(s).
        #[serde(default)]
        target: FilterTarget,
        /// Filter to change.
        filter: FilterId,
        /// Values to rotate through.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cycle: Option<Vec<f64>>,
    },
}

impl Command {
    /// True for the enabled-state command, the only command allowed to fire
    /// while the system is disabled.
    pub fn is_state_toggle(&self) -> bool {
        matches!(self, Self::SetState { .. })
    }

    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nothing => "nothing",
            Self::AdjustSpeed { .. } => "adjustSpeed",
            Self::SetSpeed { .. } => "setSpeed",
            Self::SetPin { .. } => "setPin",
            Self::SetState { .. } => "setState",
            Self::Seek { .. } => "seek",
            Self::SetPause { .. } => "setPause",
            Self::SetMute { .. } => "setMute",
            Self::SetMark { .. } => "setMark",
            Self::SeekMark { .. } => "seekMark",
            Self::OpenUrl { .. } => "openUrl",
            Self::SetFx { .. } => "setFx",
            Self::ResetFx { .. } => "resetFx",
            Self::FlipFx => "flipFx",
            Self::AdjustFilter { .. } => "adjustFilter",
            Self::SetFilter { .. } => "setFilter",
            Self::CycleFilterValue { .. } => "cycleFilterValue",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_apply() {
        assert!(Toggle::On.apply(false));
        assert!(!Toggle::Off.apply(true));
        assert!(Toggle::Toggle.apply(false));
        assert!(!Toggle::Toggle.apply(true));
    }

    #[test]
    fn tagged_commands_parse() {
        let c: Command = serde_json::from_str(r#"{"kind":"adjustSpeed","value":-0.25}"#)
            .expect("parse");
        assert_eq!(c, Command::AdjustSpeed { value: Some(-0.25) });

        let c: Command =
            serde_json::from_str(r#"{"kind":"cycleFilterValue","filter":"hueRotate"}"#)
                .expect("parse");
        assert_eq!(
            c,
            Command::CycleFilterValue {
                target: FilterTarget::Element,
                filter: FilterId::HueRotate,
                cycle: None,
            }
        );

        let c: Command = serde_json::from_str(r#"{"kind":"flipFx"}"#).expect("parse");
        assert_eq!(c, Command::FlipFx);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let r: Result<Command, _> = serde_json::from_str(r#"{"kind":"launchRocket"}"#);
        assert!(r.is_err());
    }
}
