use std::path::PathBuf;

use config::Config;
use tracing::debug;

use crate::{Error, Result, deps::ConfigStore};

/// Configuration stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store backed by `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ConfigStore for FileStore {
    fn load(&self) -> Result<Option<Config>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no stored configuration");
            return Ok(None);
        }
        Ok(Some(config::load_from_path(&self.path)?))
    }

    fn persist(&self, cfg: &Config) -> Result<()> {
        config::save_to_path(cfg, &self.path).map_err(|e| Error::Persist(e.pretty()))
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn missing_file_loads_as_none_then_round_trips() {
        let path = env::temp_dir().join(format!("tabspeed-store-{}.json", process::id()));
        fs::remove_file(&path).ok();
        let store = FileStore::new(&path);
        assert!(store.load().expect("load").is_none());

        let mut cfg = Config::default();
        cfg.common.speed = 1.25;
        store.persist(&cfg).expect("persist");
        let back = store.load().expect("load").expect("stored");
        assert_eq!(back.common.speed, 1.25);
        fs::remove_file(&path).ok();
    }
}
