// Defaults and constants for configuration values.

use keychord::Chord;

use crate::{Command, FilterId, FilterTarget, Keybind, Toggle};

pub(crate) const SPEED: f64 = 1.0;
pub(crate) const SPEED_MIN: f64 = 0.07;
pub(crate) const SPEED_MAX: f64 = 16.0;
pub(crate) const POLL_RATE_MS: u64 = 1000;
pub(crate) const MEDIA_QUERY: &str = "video, audio";
pub(crate) const ELEMENT_QUERY: &str = "video";

/// Default delta for `adjustSpeed`.
pub const SPEED_STEP: f64 = 0.1;
/// Default target for `setSpeed`.
pub const SET_SPEED: f64 = 1.0;
/// Default offset in seconds for `seek`.
pub const SEEK_SECONDS: f64 = 10.0;
/// Default rotation for `cycleFilterValue`.
pub const CYCLE: [f64; 2] = [0.0, 1.0];

// Serde default functions
pub(crate) const fn default_speed() -> f64 {
    SPEED
}
pub(crate) const fn default_true() -> bool {
    true
}
pub(crate) const fn default_speed_min() -> f64 {
    SPEED_MIN
}
pub(crate) const fn default_speed_max() -> f64 {
    SPEED_MAX
}
pub(crate) const fn default_poll_rate() -> u64 {
    POLL_RATE_MS
}
pub(crate) fn default_media_query() -> String {
    MEDIA_QUERY.to_string()
}
pub(crate) fn default_element_query() -> String {
    ELEMENT_QUERY.to_string()
}

/// Stock keybinds shipped with a fresh configuration.
pub(crate) fn default_keybinds() -> Vec<Keybind> {
    let bind = |id: &str, spec: &str, command: Command| -> Option<Keybind> {
        Chord::parse(spec)
            .ok()
            .map(|trigger| Keybind::new(id, trigger, command))
    };
    [
        bind("speed-down", "s", Command::AdjustSpeed { value: Some(-0.1) }),
        bind("speed-up", "d", Command::AdjustSpeed { value: Some(0.1) }),
        bind("speed-reset", "r", Command::SetSpeed { value: Some(1.0) }),
        bind("speed-preset", "a", Command::SetSpeed { value: Some(1.8) }),
        bind("seek-back", "z", Command::Seek { value: Some(-10.0) }),
        bind("seek-forward", "x", Command::Seek { value: Some(10.0) }),
        bind("pause", "shift+space", Command::SetPause { state: Toggle::Toggle }),
        bind("mute", "m", Command::SetMute { state: Toggle::Toggle }),
        bind("pin", "shift+p", Command::SetPin { state: Toggle::Toggle }),
        bind("state", "shift+s", Command::SetState { state: Toggle::Toggle }),
        bind("mark-set", "shift+q", Command::SetMark { key: "a".to_string() }),
        bind("mark-seek", "q", Command::SeekMark { key: "a".to_string() }),
        bind(
            "fx-toggle",
            "shift+f",
            Command::SetFx {
                target: FilterTarget::Element,
                state: Toggle::Toggle,
            },
        ),
        bind("fx-reset", "shift+r", Command::ResetFx { target: FilterTarget::Both }),
        bind("fx-flip", "shift+b", Command::FlipFx),
        bind(
            "invert-cycle",
            "i",
            Command::CycleFilterValue {
                target: FilterTarget::Element,
                filter: FilterId::Invert,
                cycle: None,
            },
        ),
        bind(
            "brightness-up",
            "shift+arrowup",
            Command::AdjustFilter {
                target: FilterTarget::Element,
                filter: FilterId::Brightness,
                value: None,
            },
        ),
        bind(
            "brightness-down",
            "shift+arrowdown",
            Command::AdjustFilter {
                target: FilterTarget::Element,
                filter: FilterId::Brightness,
                value: Some(-0.1),
            },
        ),
    ]
    .into_iter()
    .flatten()
    .map(|kb| match kb.command {
        Command::Seek { .. } | Command::SetPause { .. } | Command::SetMute { .. } => {
            kb.if_media(true)
        }
        _ => kb,
    })
    .collect()
}
