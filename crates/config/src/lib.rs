//! Persisted configuration model for tabspeed.
//!
//! The root [`Config`] holds global defaults ([`Context`]), an ordered list
//! of [`Keybind`]s, per-tab [`ContextLayer`] overrides and per-tab [`Pin`]s.
//! Keybinds carry a [`Command`] from a closed vocabulary; filter commands
//! refer to the static [`FilterCatalog`].

mod command;
mod context;
mod defaults;
mod error;
mod filters;
mod keybind;
mod loader;
mod model;
mod settings;

#[cfg(test)]
mod test_parse;

pub use command::{Command, FilterTarget, Toggle};
pub use context::{Context, ContextLayer, FxState, Pin};
pub use defaults::{CYCLE, SEEK_SECONDS, SET_SPEED, SPEED_STEP};
pub use error::{Error, excerpt_at};
pub use filters::{FilterCatalog, FilterId, FilterInfo, FilterValue, format_value};
pub use keybind::Keybind;
pub use loader::{load_from_path, load_from_str, save_to_path, to_json_string};
pub use model::{CONFIG_VERSION, Config, TabId};
pub use settings::Settings;
