//! Configuration store: fresh reads, saves and change detection
//!
//! Change detection polls the file's modification time. The engine calls
//! `changed()` on a short timer and also accepts an explicit
//! `config_changed` command from the host.
//!
//! `load()` is called on every tick but only re-parses when the file's
//! modification time or size moved, so validation warnings are logged once
//! per edit.

use super::Config;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Environment lookup, injectable for tests
pub type EnvLookup = fn(&str) -> Option<String>;

pub(crate) fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Persisted configuration as the engine sees it
pub trait ConfigStore: Send {
    /// Current configuration. Never fails: a broken file yields the last good
    /// configuration.
    fn load(&mut self) -> Config;

    /// Persist `config`
    fn save(&mut self, config: &Config) -> Result<()>;

    /// True once for each outside modification since the last call
    fn changed(&mut self) -> bool;

    /// Backing file, if there is one
    fn path(&self) -> Option<&Path>;
}

/// Modification time and length; `None` when the file is missing
type FileStamp = Option<(SystemTime, u64)>;

/// TOML file store with env overrides
pub struct FileConfigStore {
    path: Option<PathBuf>,
    env: EnvLookup,
    last_good: Config,
    /// Modification time seen by the last `changed()`
    modified: Option<SystemTime>,
    /// Stamp of the file `last_good` came from (or failed to come from)
    loaded: Option<FileStamp>,
}

impl FileConfigStore {
    pub fn new(path: Option<PathBuf>, env: EnvLookup) -> Self {
        let modified = path.as_deref().and_then(modified_time);
        Self {
            path,
            env,
            last_good: Config::default(),
            modified,
            loaded: None,
        }
    }

    /// Store at `Config::config_path()` with process env overrides
    pub fn at_default_location() -> Self {
        Self::new(Config::config_path(), process_env)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn file_stamp(path: Option<&Path>) -> FileStamp {
    let metadata = std::fs::metadata(path?).ok()?;
    Some((metadata.modified().ok()?, metadata.len()))
}

impl ConfigStore for FileConfigStore {
    fn load(&mut self) -> Config {
        let stamp = file_stamp(self.path.as_deref());
        if self.loaded == Some(stamp) {
            return self.last_good.clone();
        }
        self.loaded = Some(stamp);

        match Config::load(self.path.as_deref(), self.env) {
            Ok(config) => {
                self.last_good = config.clone();
                config
            }
            Err(e) => {
                tracing::warn!("Keeping previous configuration: {:#}", e);
                self.last_good.clone()
            }
        }
    }

    fn save(&mut self, config: &Config) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| anyhow!("No config location (home directory unknown)"))?;
        config.save_to(path)?;

        // Our own write is not an outside change
        self.modified = modified_time(path);
        self.loaded = Some(file_stamp(Some(path)));
        self.last_good = config.clone();
        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    fn changed(&mut self) -> bool {
        let Some(path) = self.path.as_deref() else {
            return false;
        };
        let current = modified_time(path);
        if current == self.modified {
            return false;
        }
        self.modified = current;
        true
    }

    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
