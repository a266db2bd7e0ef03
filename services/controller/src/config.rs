use anyhow::{Context, Result};
use protocol::config::{DEFAULT_BASE_URL, DEFAULT_DESIRED_SPEED_KMH};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HISTORY_DIR: &str = "logs";

/// Settings read from the optional TOML file. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    pub base_url: String,
    pub desired_speed_kmh: f64,
    pub log_level: String,
    pub history_dir: PathBuf,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            desired_speed_kmh: DEFAULT_DESIRED_SPEED_KMH,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
        }
    }
}

impl ControllerConfig {
    /// # Errors
    /// Fails if the file cannot be read or is not valid TOML for this layout.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// # Errors
    /// Fails on malformed TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// # Errors
    /// Same as [`ControllerConfig::load`]; `None` yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Replaces the base URL when one was given on the command line.
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        self
    }
}

/// Picks the planning speed: command line, then junction file, then config file.
#[must_use]
pub fn resolve_speed(cli: Option<f64>, junction_file: Option<f64>, config: &ControllerConfig) -> f64 {
    cli.or(junction_file).unwrap_or(config.desired_speed_kmh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ControllerConfig::parse("").unwrap(), ControllerConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ControllerConfig::parse(
            "base_url = \"http://10.0.0.5:36000/api/greenwave\"\nlog_level = \"debug\"\n",
        )
        .unwrap();

        assert_eq!(config.base_url, "http://10.0.0.5:36000/api/greenwave");
        assert_eq!(config.log_level, "debug");
        assert!((config.desired_speed_kmh - DEFAULT_DESIRED_SPEED_KMH).abs() < f64::EPSILON);
        assert_eq!(config.history_dir, PathBuf::from(DEFAULT_HISTORY_DIR));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(ControllerConfig::parse("base_uri = \"x\"").is_err());
    }

    #[test]
    fn cli_base_url_wins() {
        let config = ControllerConfig::parse("base_url = \"http://file\"")
            .unwrap()
            .with_base_url(Some("http://svc".into()));
        assert_eq!(config.base_url, "http://svc");

        let kept = ControllerConfig::parse("base_url = \"http://file\"").unwrap().with_base_url(None);
        assert_eq!(kept.base_url, "http://file");
    }

    #[test]
    fn speed_resolution_order() {
        let config = ControllerConfig::parse("desired_speed_kmh = 30.0").unwrap();

        assert!((resolve_speed(Some(70.0), Some(50.0), &config) - 70.0).abs() < f64::EPSILON);
        assert!((resolve_speed(None, Some(50.0), &config) - 50.0).abs() < f64::EPSILON);
        assert!((resolve_speed(None, None, &config) - 30.0).abs() < f64::EPSILON);
        assert!(
            (resolve_speed(None, None, &ControllerConfig::default()) - DEFAULT_DESIRED_SPEED_KMH).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("greenwave-controller-missing-config.toml");
        assert!(ControllerConfig::load(&path).is_err());
    }
}
