// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persistence settings and where they are kept.
//!
//! [`StoreConfig`] is stored as JSON under [`STORE_CONFIG_KEY`] in a
//! [`ConfigStore`]. A missing or empty blob means "all defaults".

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use directories::ProjectDirs;
use ns_state::SerializerMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Key under which [`StoreConfig`] is saved.
pub const STORE_CONFIG_KEY: &str = "store";

/// Errors reading or writing [`StoreConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the blob failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// The blob is not a valid `StoreConfig` document.
    #[error("malformed store config: {0}")]
    Json(#[from] serde_json::Error),
    /// The platform has no home directory to derive config or data dirs from.
    #[error("no platform config directory; pass one explicitly")]
    NoProjectDirs,
}

/// Blob storage for config documents, keyed by name.
///
/// Absence is `None`, as with [`HistoryStore`](crate::HistoryStore).
pub trait ConfigStore {
    /// The blob for `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError>;
    /// Stores `data` under `key`, replacing any previous blob.
    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Loads and saves [`StoreConfig`] through a [`ConfigStore`].
#[derive(Debug)]
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Wraps `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S: ConfigStore> ConfigService<S> {
    /// The saved config, or the default one if none is saved.
    pub fn load(&self) -> Result<StoreConfig, ConfigError> {
        match self.store.read(STORE_CONFIG_KEY)? {
            Some(bytes) if !bytes.is_empty() => Ok(serde_json::from_slice(&bytes)?),
            _ => {
                debug!("no store config saved, using defaults");
                Ok(StoreConfig::default())
            }
        }
    }

    /// Saves `config` as pretty-printed JSON.
    pub fn save(&self, config: &StoreConfig) -> Result<(), ConfigError> {
        let data = serde_json::to_vec_pretty(config)?;
        self.store.write(STORE_CONFIG_KEY, &data)
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("dev", "flyingrobots", "ns-state").ok_or(ConfigError::NoProjectDirs)
}

/// One `{key}.json` file per config document under a directory.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    base: PathBuf,
}

impl FsConfigStore {
    /// A store under the platform config dir (e.g. `~/.config/ns-state`).
    pub fn new() -> Result<Self, ConfigError> {
        Self::at(project_dirs()?.config_dir().to_path_buf())
    }

    /// A store under `base`, created if needed.
    pub fn at(base: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let base = base.into();
        fs::create_dir_all(&base)?;
        Ok(Self { base })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base.join(format!("{key}.json"))
    }
}

impl ConfigStore for FsConfigStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        // Same temp-then-rename write as the record tier.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &path)?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }
}

/// Persistence settings for namespace state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Mode used for new records.
    pub mode: SerializerMode,
    /// Record directory; the platform data dir when unset.
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured data directory, or the platform default.
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().join("histories")),
        }
    }
}
