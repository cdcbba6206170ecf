// SPDX-License-Identifier: Apache-2.0

//! Configuration management for yogit.
//!
//! Provides layered configuration from files and environment variables.
//! Uses XDG-compliant paths with environment variable support.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variables (prefix: `YOGIT_`)
//! 2. Config file: `~/.config/yogit/config.toml`
//! 3. Built-in defaults
//!
//! # Examples
//!
//! ```bash
//! # Point yogit at a GitHub Enterprise instance
//! YOGIT_GITHUB__GRAPHQL_URL=https://ghe.example.com/api/graphql yogit pr list
//! ```

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::YogitError;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// Query engine settings.
    pub query: QueryConfig,
    /// Update check settings.
    pub update: UpdateConfig,
}

/// GitHub API settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    pub api_url: String,
    /// URL of the GraphQL endpoint.
    pub graphql_url: String,
    /// API request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            graphql_url: "https://api.github.com/graphql".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Query engine settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Maximum number of pages a single paginated query may fetch.
    pub max_pages: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { max_pages: 100 }
    }
}

/// Update check settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Look for a newer release before running commands.
    pub enabled: bool,
    /// Repository whose tags are compared against the running version.
    pub repository: String,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repository: "hasboeuf/yogit".to_string(),
        }
    }
}

/// Returns the yogit configuration directory.
///
/// Respects the `XDG_CONFIG_HOME` environment variable if set,
/// otherwise defaults to `~/.config/yogit`.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        return PathBuf::from(xdg_config).join("yogit");
    }
    dirs::home_dir()
        .expect("Could not determine home directory - is HOME set?")
        .join(".config")
        .join("yogit")
}

/// Returns the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Returns the path to the account settings file.
#[must_use]
pub fn settings_file_path() -> PathBuf {
    config_dir().join("settings.toml")
}

/// Returns the path to the SCRUM report template.
#[must_use]
pub fn scrum_report_file_path() -> PathBuf {
    config_dir().join("scrum_report.toml")
}

/// Load application configuration.
///
/// Loads from config file (if exists) and environment variables.
/// Environment variables use the prefix `YOGIT_` and double underscore
/// for nested keys (e.g., `YOGIT_QUERY__MAX_PAGES`).
///
/// # Errors
///
/// Returns `YogitError::Config` if the config file exists but is invalid.
pub fn load_config() -> Result<AppConfig, YogitError> {
    let config_path = config_file_path();

    let config = Config::builder()
        .add_source(File::with_name(config_path.to_string_lossy().as_ref()).required(false))
        .add_source(
            Environment::with_prefix("YOGIT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    Ok(app_config)
}
