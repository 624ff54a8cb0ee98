use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;
use std::path::{Path, PathBuf};

/// Reads and writes the config file at a fixed location.
///
/// Every mutation re-reads the file first so edits made by another process
/// (or another command) between two writes are not lost.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store backed by the platform configuration directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::new(Config::config_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        Config::load_from_path(&self.path)
    }

    pub fn mutate<F, T>(&self, mutator: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&mut Config) -> T,
    {
        let mut working = self.load()?;
        let result = mutator(&mut working);
        working.save_to_path(&self.path)?;
        Ok(result)
    }
}
