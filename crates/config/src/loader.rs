//! Parse, load and write the JSON configuration.

use std::{fs, path::Path};

use tracing::debug;

use crate::{Config, Error, error::excerpt_at};

/// Parse and validate a configuration from JSON text.
pub fn load_from_str(source: &str) -> Result<Config, Error> {
    let cfg: Config = serde_json::from_str(source).map_err(|e| {
        let (line, col) = (e.line(), e.column());
        Error::Parse {
            path: None,
            line,
            col,
            message: e.to_string(),
            excerpt: excerpt_at(source, line, col),
        }
    })?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load a configuration file. A missing file is an error; callers wanting a
/// default should check for existence first.
pub fn load_from_path(path: &Path) -> Result<Config, Error> {
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    let cfg = load_from_str(&source).map_err(|e| e.with_path(path))?;
    debug!(path = %path.display(), keybinds = cfg.keybinds.len(), "config_loaded");
    Ok(cfg)
}

/// Serialize a configuration as pretty JSON.
pub fn to_json_string(cfg: &Config) -> Result<String, Error> {
    serde_json::to_string_pretty(cfg).map_err(|e| Error::Read {
        path: None,
        message: format!("serialize: {}", e),
    })
}

/// Write a configuration to `path`, replacing any existing file.
pub fn save_to_path(cfg: &Config, path: &Path) -> Result<(), Error> {
    let text = to_json_string(cfg)?;
    fs::write(path, text).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })
}
