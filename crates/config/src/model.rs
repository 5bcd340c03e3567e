//! The persisted configuration root.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{Command, Context, ContextLayer, Error, Keybind, Pin, Settings, defaults};

/// Browser tab identifier.
pub type TabId = u64;

/// Current schema version written by this crate.
pub const CONFIG_VERSION: u32 = 1;

/// Configuration root: global defaults, keybinds, per-tab overrides and pins.
///
/// Loaded once at startup, replaced wholesale on external change, and
/// otherwise mutated only by command handlers through the engine's single
/// write-back path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema version.
    #[serde(default)]
    pub version: u32,
    /// Global tunables.
    #[serde(default)]
    pub settings: Settings,
    /// Global default context, the bottom layer of resolution.
    #[serde(default)]
    pub common: Context,
    /// Ordered hotkey bindings; dispatch follows this order.
    #[serde(default = "defaults::default_keybinds")]
    pub keybinds: Vec<Keybind>,
    /// Per-tab override layers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tabs: BTreeMap<TabId, ContextLayer>,
    /// Per-tab pins, consulted above the tab overrides.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pins: BTreeMap<TabId, Pin>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            settings: Settings::default(),
            common: Context::default(),
            keybinds: defaults::default_keybinds(),
            tabs: BTreeMap::new(),
            pins: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Configuration with default settings and context and the given keybinds.
    pub fn with_keybinds(keybinds: Vec<Keybind>) -> Self {
        Self {
            keybinds,
            ..Self::default()
        }
    }

    /// Pin for `tab`, if any.
    pub fn pin(&self, tab: TabId) -> Option<&Pin> {
        self.pins.get(&tab)
    }

    /// Check value consistency that the type system cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        let s = &self.settings;
        if !(s.speed_min > 0.0 && s.speed_min <= s.speed_max) {
            return Err(Error::invalid(format!(
                "invalid speed range [{}, {}]: need 0 < min <= max",
                s.speed_min, s.speed_max
            )));
        }
        if s.poll_rate == 0 {
            return Err(Error::invalid("pollRate must be positive"));
        }
        let mut seen = HashSet::new();
        for kb in &self.keybinds {
            if !seen.insert(kb.id.as_str()) {
                return Err(Error::invalid(format!("duplicate keybind id '{}'", kb.id)));
            }
            if let Command::CycleFilterValue {
                cycle: Some(list), ..
            } = &kb.command
                && list.is_empty()
            {
                return Err(Error::invalid(format!(
                    "keybind '{}': cycle list must not be empty",
                    kb.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        cfg.validate().expect("valid");
        assert!(!cfg.keybinds.is_empty());
        assert!(cfg.keybinds.iter().any(|k| k.command.is_state_toggle()));
    }

    #[test]
    fn inverted_speed_range_rejected() {
        let mut cfg = Config::default();
        cfg.settings.speed_min = 4.0;
        cfg.settings.speed_max = 2.0;
        assert!(matches!(cfg.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let mut cfg = Config::default();
        let first = cfg.keybinds[0].clone();
        cfg.keybinds.push(first);
        let err = cfg.validate().expect_err("duplicate");
        assert!(err.to_string().contains("duplicate keybind id"));
    }
}
