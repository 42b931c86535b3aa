//! Profile file handling for the bigip CLI
//!
//! Manages ~/.bigip/config.toml and merges it with command-line flags and
//! `BIGIP_*` environment variables into a [`BigIpConfig`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::BigIpConfig;

/// CLI profile stored in ~/.bigip/config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_auth: Option<bool>,

    /// Request timeout in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
}

impl CliConfig {
    /// Default profile location (~/.bigip/config.toml)
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Unable to determine home directory")?;

        Ok(PathBuf::from(home).join(".bigip").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Load a profile; a missing file is an empty profile.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

/// Connection settings given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionFlags {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token_auth: bool,
    pub insecure: bool,
    pub timeout: Option<u64>,
}

/// Resolve connection settings from flags, the profile file and the environment
///
/// Priority order per setting:
/// 1. command line flag
/// 2. ~/.bigip/config.toml
/// 3. BIGIP_* environment variable
/// 4. built-in default
pub fn resolve_connection(flags: ConnectionFlags) -> Result<BigIpConfig> {
    let profile = CliConfig::load().unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring unreadable config file");
        CliConfig::default()
    });
    Ok(merge(flags, profile, BigIpConfig::from_env()))
}

/// Layer `flags` over `profile` over `env`
pub fn merge(flags: ConnectionFlags, profile: CliConfig, env: BigIpConfig) -> BigIpConfig {
    let mut config = env;

    if let Some(host) = flags.host.or(profile.host).filter(|h| !h.is_empty()) {
        config.host = host;
    }
    if let Some(port) = flags.port.or(profile.port) {
        config.port = Some(port);
    }
    if let Some(username) = flags.username.or(profile.username).filter(|u| !u.is_empty()) {
        config.username = username;
    }
    if let Some(password) = flags.password.or(profile.password) {
        config.password = password;
    }
    if let Some(timeout) = flags.timeout.or(profile.timeout) {
        config.timeout_seconds = timeout;
    }

    // Boolean flags can only switch a setting on.
    if flags.token_auth {
        config.token_auth = true;
    } else if let Some(token_auth) = profile.token_auth {
        config.token_auth = token_auth;
    }
    if flags.insecure {
        config.insecure_skip_verify = true;
    } else if let Some(insecure) = profile.insecure {
        config.insecure_skip_verify = insecure;
    }

    debug!(host = %config.host, username = %config.username, "Resolved connection settings");
    config
}
