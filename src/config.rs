//! Configuration management for leakdb-client

use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection
    pub backend: BackendConfig,
    /// Worker status polling
    pub poll: PollConfig,
    /// Presentation
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin the `/upload`, `/search` and `/worker-status` paths are joined onto
    pub base_url: String,
    /// Request timeout in seconds (unset = transport default)
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// chrono format string for result dates
    pub date_format: String,
    pub accent_color: String,
    pub alert_color: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
            accent_color: "#39ff14".to_string(),
            alert_color: "#ff1744".to_string(),
            window_width: 900.0,
            window_height: 800.0,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Config {
    /// Get default configuration file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leakdb-client")
            .join("config.toml")
    }

    /// Load configuration from file, falling back to defaults when it does not exist
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(PathBuf::from).unwrap_or_else(Self::default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!("Loaded config from {}", path.display());
            Ok(config)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = Url::parse(&self.backend.base_url) {
            bail!("invalid backend.base_url {:?}: {}", self.backend.base_url, e);
        }
        if self.poll.interval_secs == 0 {
            bail!("poll.interval_secs must be at least 1");
        }
        if self.backend.timeout_secs == Some(0) {
            bail!("backend.timeout_secs must be at least 1 when set");
        }
        if StrftimeItems::new(&self.ui.date_format).any(|item| matches!(item, Item::Error)) {
            bail!("ui.date_format {:?} is not a valid strftime format", self.ui.date_format);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.poll.interval(), Duration::from_secs(5));
        assert!(config.backend.timeout_secs.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_is_completed_with_defaults() {
        let file = write_config(
            r#"
[backend]
base_url = "https://leaks.internal:9000"

[ui]
date_format = "%d/%m/%Y %H:%M"
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.backend.base_url, "https://leaks.internal:9000");
        assert_eq!(config.ui.date_format, "%d/%m/%Y %H:%M");
        assert_eq!(config.ui.accent_color, "#39ff14");
        assert_eq!(config.poll.interval_secs, 5);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config("[poll]\ninterval_secs = 0\n");
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_date_format_is_rejected() {
        let file = write_config("[ui]\ndate_format = \"%Y-%Q\"\n");
        let config = Config::load(Some(file.path())).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ui.date_format"));
    }

    #[test]
    fn unparsable_origin_is_rejected() {
        let mut config = Config::default();
        config.backend.base_url = "localhost port 8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let file = write_config("[backend\nbase_url = ");
        assert!(Config::load(Some(file.path())).is_err());
    }
}
