//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments (`--config`, `HUBCLIENT_CONFIG`)

use crate::error::{Error, Result};
use hubclient_core::HubClientConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hub client settings (scheme, trusted domains, timeout, ...)
    pub client: HubClientConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Where learned settings are persisted; defaults to the user config dir
    pub settings_file: Option<PathBuf>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Use colored output by default
    pub color: bool,

    /// Show progress indicators
    pub progress: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when no -v is given
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config
            .client
            .validate()
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to load config");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".hubclient.yaml"),
            PathBuf::from(".hubclient.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let hubclient_dir = config_dir.join("hubclient");
            paths.push(hubclient_dir.join("config.yaml"));
            paths.push(hubclient_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".hubclient.yaml"));
            paths.push(home_dir.join(".hubclient.json"));
        }

        paths
    }

    /// Resolve where learned settings live, `--settings` winning over the file
    pub fn settings_path(&self, cli_override: Option<&Path>) -> PathBuf {
        cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.settings_file.clone())
            .unwrap_or_else(default_settings_path)
    }
}

/// `<config dir>/hubclient/settings.json`
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hubclient")
        .join("settings.json")
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hubclient.yaml");
        std::fs::write(
            &path,
            "client:\n  scheme: http\n  timeout_secs: 5\n  trusted_domains: [example.net]\nsettings_file: /tmp/hub.json\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.client.scheme, "http");
        assert_eq!(config.client.timeout_secs, 5);
        assert_eq!(config.client.trusted_domains, vec!["example.net".to_string()]);
        assert_eq!(config.client.device_type, "android");
        assert_eq!(config.settings_file, Some(PathBuf::from("/tmp/hub.json")));
    }

    #[test]
    fn test_load_json_config_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hubclient.json");
        std::fs::write(&path, r#"{"logging": {"format": "json"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.client, HubClientConfig::default());
        assert_eq!(config.logging.format.as_deref(), Some("json"));
        assert!(config.output.color);
    }

    #[test]
    fn test_invalid_client_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hubclient.json");
        std::fs::write(&path, r#"{"client": {"scheme": "ftp"}}"#).unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_settings_path_precedence() {
        let config = Config {
            settings_file: Some(PathBuf::from("from-config.json")),
            ..Config::default()
        };
        assert_eq!(
            config.settings_path(Some(Path::new("from-cli.json"))),
            PathBuf::from("from-cli.json")
        );
        assert_eq!(config.settings_path(None), PathBuf::from("from-config.json"));
        assert!(Config::default()
            .settings_path(None)
            .ends_with("hubclient/settings.json"));
    }
}
