//! Configuration types for lsds.
//!
//! [`Config::load`] reads `~/.config/lsds/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::QueryLanguage;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[datasource]
org_name     = ""
project_name = ""
api_host     = "https://api.lightstep.com"
app_host     = "https://app.lightstep.com"
url          = "http://localhost:3000/api/datasources/proxy/1"
plugin_id    = "lightstep-metrics-datasource"

[query]
default_language = "tql"
interval         = "60s"
link_title       = "Create a Notebook in Lightstep"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level configuration, loaded from `~/.config/lsds/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub datasource: DatasourceConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// `[datasource]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasourceConfig {
    #[serde(default)]
    pub org_name: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(default = "default_api_host")]
    pub api_host: String,
    /// Host of the web app, used for notebook links.
    #[serde(default = "default_app_host")]
    pub app_host: String,
    /// Base URL requests are posted to (the host's data source proxy).
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_plugin_id")]
    pub plugin_id: String,
}

fn default_api_host() -> String { "https://api.lightstep.com".to_string() }
fn default_app_host() -> String { "https://app.lightstep.com".to_string() }
fn default_url() -> String { "http://localhost:3000/api/datasources/proxy/1".to_string() }
fn default_plugin_id() -> String { "lightstep-metrics-datasource".to_string() }

impl Default for DatasourceConfig {
    fn default() -> Self {
        Self {
            org_name: String::new(),
            project_name: String::new(),
            api_host: default_api_host(),
            app_host: default_app_host(),
            url: default_url(),
            plugin_id: default_plugin_id(),
        }
    }
}

/// `[query]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default)]
    pub default_language: QueryLanguage,
    /// Output period, e.g. `60s`, `5m`.
    #[serde(default = "default_interval")]
    pub interval: String,
    #[serde(default = "default_link_title")]
    pub link_title: String,
}

fn default_interval() -> String { "60s".to_string() }
fn default_link_title() -> String { "Create a Notebook in Lightstep".to_string() }

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_language: QueryLanguage::default(),
            interval: default_interval(),
            link_title: default_link_title(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

/// A required setting is missing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Organization name is required")]
    MissingOrgName,
    #[error("Project name is required")]
    MissingProjectName,
}

impl Config {
    /// Load from `~/.config/lsds/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file, layered on top of the built-in defaults.
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Check the settings every request needs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.datasource.org_name.is_empty() {
            return Err(ConfigError::MissingOrgName);
        }
        if self.datasource.project_name.is_empty() {
            return Err(ConfigError::MissingProjectName);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("lsds")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.datasource.api_host, "https://api.lightstep.com");
        assert_eq!(cfg.datasource.plugin_id, "lightstep-metrics-datasource");
        assert_eq!(cfg.query.default_language, QueryLanguage::Tql);
        assert_eq!(cfg.query.interval, "60s");
    }

    #[test]
    fn defaults_fail_validation() {
        let mut cfg = Config::defaults();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingOrgName));
        cfg.datasource.org_name = "acme".into();
        assert_eq!(cfg.validate(), Err(ConfigError::MissingProjectName));
        cfg.datasource.project_name = "demo".into();
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/lsds/config.toml")).unwrap();
        assert_eq!(cfg.query.link_title, "Create a Notebook in Lightstep");
    }
}
