//! Client configuration, resolved once at startup.
//!
//! Loaded from `<config_dir>/sdu/config.toml`. A missing file yields the
//! defaults; a present but broken file is an error rather than a silent
//! fallback.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("base_url must start with http:// or https://, got '{0}'")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend origin; endpoint paths are appended to it.
    pub base_url: String,
    /// Request timeout. `None` means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// `tracing-subscriber` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// `<config_dir>/sdu/config.toml`, falling back to the working directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sdu")
            .join("config.toml")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config: ClientConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply a command-line base URL override.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Result<Self, ConfigError> {
        if let Some(url) = base_url {
            self.base_url = url;
            self.validate()?;
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidBaseUrl(self.base_url.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"https://sdu.example.org\"\ntimeout_secs = 15\n").unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.base_url, "https://sdu.example.org");
        assert_eq!(config.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = [[[").unwrap();
        assert!(matches!(
            ClientConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn rejects_non_http_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "base_url = \"localhost:8000\"\n").unwrap();
        assert!(matches!(
            ClientConfig::load(&path),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn override_base_url() {
        let config = ClientConfig::default()
            .with_base_url(Some("https://other".into()))
            .unwrap();
        assert_eq!(config.base_url, "https://other");
        assert!(ClientConfig::default()
            .with_base_url(Some("ftp://x".into()))
            .is_err());
        assert_eq!(
            ClientConfig::default().with_base_url(None).unwrap(),
            ClientConfig::default()
        );
    }
}
