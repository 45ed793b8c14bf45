//! CLI configuration
//!
//! Read from `config.toml` in the platform config directory
//! (e.g. `~/.config/abacus/config.toml`). Every field is optional and
//! command-line flags take precedence.
//!
//! ```toml
//! [history]
//! mode = "account"        # anonymous | guest | account
//! user = "ada"
//! path = "/tmp/history.json"
//!
//! [remote]
//! url = "http://localhost:3000/api"
//! token = "..."
//! ```

use std::path::{Path, PathBuf};

use abacus_core::{Calculator, FileStore, HistoryStore, RemoteStore, SessionMode};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryConfig {
    pub mode: Option<ModeKind>,
    pub user: Option<String>,
    /// Overrides the history file location
    pub path: Option<PathBuf>,
}

/// Remote history backend; used for account sessions when present
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// Keep history for this run only
    Anonymous,
    /// Keep history on this machine under the guest key
    Guest,
    /// Keep history for a user, remotely when configured
    Account,
}

impl Config {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "abacus").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the config file. An explicit path must exist; the default one
    /// may be missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the session mode, letting flags win over the file
    pub fn session_mode(&self, mode: Option<ModeKind>, user: Option<&str>) -> Result<SessionMode> {
        let user = user.or(self.history.user.as_deref());
        let mode = mode
            .or(self.history.mode)
            .unwrap_or(if user.is_some() {
                ModeKind::Account
            } else {
                ModeKind::Anonymous
            });

        Ok(match mode {
            ModeKind::Anonymous => SessionMode::Anonymous,
            ModeKind::Guest => SessionMode::Guest,
            ModeKind::Account => match user {
                Some(user_id) => SessionMode::Account {
                    user_id: user_id.to_string(),
                },
                None => bail!("account mode needs a user (--user or [history] user)"),
            },
        })
    }

    /// Build a calculator for the session, wired to the right store
    pub fn build_calculator(&self, mode: &SessionMode) -> Result<Calculator> {
        let store: Box<dyn HistoryStore> = match (mode, &self.remote) {
            (SessionMode::Anonymous, _) => return Ok(Calculator::new()),
            (SessionMode::Account { .. }, Some(remote)) => {
                tracing::info!(url = %remote.url, "using remote history");
                Box::new(
                    RemoteStore::new(remote.url.as_str(), &remote.token)
                        .context("Failed to set up remote history")?,
                )
            }
            _ => {
                let path = match &self.history.path {
                    Some(path) => path.clone(),
                    None => FileStore::default_path()
                        .context("No data directory for the history file")?,
                };
                tracing::info!(path = %path.display(), "using history file");
                Box::new(FileStore::new(path))
            }
        };

        Ok(Calculator::with_store(mode, store))
    }
}
