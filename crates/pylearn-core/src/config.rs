//! Application configuration.
//!
//! ## Learning: Serde for Serialization
//!
//! `#[serde(default)]` on every section means a config file only needs the
//! keys it wants to change; everything else keeps its default.
//!
//! ## Precedence for the backend URL
//!
//! CLI flag > `PYLEARN_API_URL` > `api.base_url` in the file > built-in
//! default. The CLI layer is applied by the binary; this module handles the
//! rest.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::theme::Appearance;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "PYLEARN_API_URL";

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend settings
    pub api: ApiConfig,

    /// Editor behavior settings
    pub editor: EditorConfig,

    /// UI appearance settings
    pub ui: UiConfig,
}

impl Config {
    /// Loads config from the default location, then applies the
    /// environment override. Problems are logged and defaults used.
    pub fn load() -> Self {
        let mut config = match Self::load_from_default_path() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default config: {}", e);
                Self::default()
            }
        };
        config.apply_env(std::env::var(API_URL_ENV).ok());
        config
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Loads from the default config path.
    fn load_from_default_path() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("pylearn").join("config.toml"))
    }

    /// Saves the config to the default path.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Saves the config to `path`.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Applies a `PYLEARN_API_URL` value, ignoring blanks.
    pub fn apply_env(&mut self, api_url: Option<String>) {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
    }

    /// Applies a `--api-url` flag, which beats everything else.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = url;
        }
        self
    }
}

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Path of the code execution endpoint
    pub execute_path: String,

    /// Per-request timeout; no timeout when unset
    pub request_timeout_secs: Option<u64>,

    /// Rewrite a trailing bare name into `print(name)` before running
    pub auto_display: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            execute_path: "/execute-code".to_string(),
            request_timeout_secs: None,
            auto_display: true,
        }
    }
}

/// Editor behavior configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Tab width in spaces
    pub tab_size: usize,

    /// Undo history limit
    pub undo_limit: usize,

    /// Key combinations that run the code
    pub run_keys: Vec<String>,

    /// Completion candidates shown at once
    pub max_completions: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: 4,
            undo_limit: 1000,
            run_keys: vec!["Shift+Enter".to_string(), "Ctrl+Enter".to_string()],
            max_completions: 8,
        }
    }
}

/// UI appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Ambient light/dark setting, picks the fallback theme
    pub appearance: Appearance,

    /// Font size in points
    pub font_size: f32,

    pub window_width: f32,
    pub window_height: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            appearance: Appearance::Dark,
            font_size: 14.0,
            window_width: 1280.0,
            window_height: 820.0,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.editor.tab_size, 4);
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.execute_path, "/execute-code");
        assert!(config.api.request_timeout_secs.is_none());
        assert_eq!(config.ui.appearance, Appearance::Dark);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            execute_path = "/execute_code"

            [ui]
            appearance = "light"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.execute_path, "/execute_code");
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.ui.appearance, Appearance::Light);
        assert_eq!(config.editor.max_completions, 8);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.request_timeout_secs = Some(30);
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_url_precedence() {
        let mut config = Config::default();
        config.api.base_url = "http://from-file/api".to_string();

        config.apply_env(Some("  ".to_string()));
        assert_eq!(config.api.base_url, "http://from-file/api");

        config.apply_env(Some("http://from-env/api".to_string()));
        assert_eq!(config.api.base_url, "http://from-env/api");

        let config = config.with_api_url(Some("http://from-cli/api".to_string()));
        assert_eq!(config.api.base_url, "http://from-cli/api");
    }
}
