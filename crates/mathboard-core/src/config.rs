use crate::mode::ViewMode;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_STRUCTURED_PATH: &str = "/api/chat";
pub const DEFAULT_BASIC_PATH: &str = "/api/chat-basic";

/// Environment variable that overrides the configured backend URL.
pub const URL_ENV: &str = "MATHBOARD_URL";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub base_url: Option<String>,
    pub structured_path: Option<String>,
    pub basic_path: Option<String>,
    pub default_mode: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the user config directory, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    /// Apply the `MATHBOARD_URL` environment variable, if set.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = Some(url);
            }
        }
        self
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn structured_path(&self) -> String {
        self.structured_path
            .clone()
            .unwrap_or_else(|| DEFAULT_STRUCTURED_PATH.to_string())
    }

    pub fn basic_path(&self) -> String {
        self.basic_path
            .clone()
            .unwrap_or_else(|| DEFAULT_BASIC_PATH.to_string())
    }

    pub fn default_mode(&self) -> ViewMode {
        self.default_mode
            .as_deref()
            .and_then(ViewMode::from_str)
            .unwrap_or_default()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mathboard").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert_eq!(config.structured_path(), "/api/chat");
        assert_eq!(config.basic_path(), "/api/chat-basic");
        assert_eq!(config.default_mode(), ViewMode::Tutor);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mathboard").join("config.json");
        let config = Config {
            base_url: Some("http://10.0.0.2:8000".to_string()),
            structured_path: None,
            basic_path: Some("/chat".to_string()),
            default_mode: Some("chat".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.default_mode(), ViewMode::Chat);
        assert_eq!(loaded.basic_path(), "/chat");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "base_url": "http://example.test" }"#).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.base_url(), "http://example.test");
        assert_eq!(loaded.structured_path(), "/api/chat");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
