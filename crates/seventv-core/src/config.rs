//! Client configuration persistence and environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://7tv.io/v3";
pub const DEFAULT_GQL_URL: &str = "https://7tv.io/v3/gql";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Stored client configuration (persisted as JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SevenTvConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_gql_url")]
    pub gql_url: String,
    /// Bearer token for mutations.
    #[serde(default)]
    pub token: Option<String>,
    /// Owner of newly created emote sets.
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_gql_url() -> String {
    DEFAULT_GQL_URL.into()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for SevenTvConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            gql_url: DEFAULT_GQL_URL.into(),
            token: None,
            user_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            config_path: PathBuf::new(),
        }
    }
}

impl SevenTvConfig {
    /// Load config from file, falling back to env vars and defaults.
    pub fn load(config_path: &Path) -> Self {
        let mut config: SevenTvConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Defaults plus environment, no file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Endpoint overrides always win; credentials only fill gaps.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("SEVENTV_API_URL") {
            self.api_url = url;
        }
        if let Some(url) = lookup("SEVENTV_GQL_URL") {
            self.gql_url = url;
        }
        if self.token.is_none() {
            self.token = lookup("SEVENTV_TOKEN");
        }
        if self.user_id.is_none() {
            self.user_id = lookup("SEVENTV_USER_ID");
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved 7TV config to {}", self.config_path.display());
        Ok(())
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config("SEVENTV_TOKEN is not set".into()))
    }

    pub fn require_user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("SEVENTV_USER_ID is not set".into()))
    }
}
