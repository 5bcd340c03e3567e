//! Global settings that are not part of any context layer.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Tunables shared by every tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Lower speed bound.
    #[serde(default = "defaults::default_speed_min")]
    pub speed_min: f64,
    /// Upper speed bound.
    #[serde(default = "defaults::default_speed_max")]
    pub speed_max: f64,
    /// Suppress the transient on-screen indicator.
    #[serde(default)]
    pub hide_indicator: bool,
    /// Track elements by polling instead of reacting to DOM mutations.
    #[serde(default)]
    pub use_polling: bool,
    /// Polling interval in milliseconds.
    #[serde(default = "defaults::default_poll_rate")]
    pub poll_rate: u64,
    /// Selector for media elements.
    #[serde(default = "defaults::default_media_query")]
    pub media_query: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed_min: defaults::SPEED_MIN,
            speed_max: defaults::SPEED_MAX,
            hide_indicator: false,
            use_polling: false,
            poll_rate: defaults::POLL_RATE_MS,
            media_query: defaults::MEDIA_QUERY.to_string(),
        }
    }
}

impl Settings {
    /// Clamp `speed` into the configured range. Never panics, even on an
    /// unvalidated inverted range.
    pub fn clamp_speed(&self, speed: f64) -> f64 {
        speed.max(self.speed_min).min(self.speed_max)
    }
}
