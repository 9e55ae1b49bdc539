//! Session configuration store
//!
//! The login state is stored in `$SMCTL_CONFIG` or, by default, in
//! `~/.config/smctl/config.toml` (platform equivalent).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

use crate::domain::SessionConfig;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "SMCTL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No session configuration found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse session configuration: {0}")]
    Parse(String),

    #[error("Session configuration is incomplete")]
    Incomplete,

    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Load/save contract for the persisted session
///
/// `load` fails whenever no complete session is stored; callers treat every
/// failure as "not logged in". `save` replaces the stored session atomically.
pub trait Configuration {
    fn load(&self) -> Result<SessionConfig>;

    fn save(&self, session: &SessionConfig) -> Result<()>;
}

/// Session store backed by a TOML file
#[derive(Debug, Clone)]
pub struct FileConfiguration {
    path: PathBuf,
}

impl FileConfiguration {
    /// Creates a store at the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates the store from `$SMCTL_CONFIG` or the user config directory
    pub fn from_env() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::new(path));
        }

        let dir = Self::default_config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dir.join("config.toml")))
    }

    /// Returns the default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "smctl").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the path to the config file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Configuration for FileConfiguration {
    fn load(&self) -> Result<SessionConfig> {
        debug!(path = %self.path.display(), "loading session");

        if !self.path.exists() {
            return Err(ConfigError::NotFound(self.path.clone()).into());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config: {}", self.path.display()))?;

        let session: SessionConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if !session.is_complete() {
            return Err(ConfigError::Incomplete.into());
        }

        Ok(session)
    }

    fn save(&self, session: &SessionConfig) -> Result<()> {
        debug!(path = %self.path.display(), "saving session");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(session).context("Failed to serialize session")?;

        // Write to temp file first
        let temp_path = self.path.with_extension("toml.tmp");

        {
            let mut options = OpenOptions::new();
            options.write(true).create(true).truncate(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::OpenOptionsExt;
                options.mode(0o600);
            }

            let mut file = options
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            file.lock_exclusive()
                .context("Failed to acquire write lock on config")?;

            file.write_all(content.as_bytes())
                .context("Failed to write config")?;
            file.sync_all().context("Failed to flush config")?;
        }

        // Atomic rename
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to write config: {}", self.path.display()))
    }
}
