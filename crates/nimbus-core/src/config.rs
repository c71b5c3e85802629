use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted when no API key is set in the config file.
pub const API_KEY_ENV: &str = "GIPHY_API_KEY";

/// Default media-search endpoint root.
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.giphy.com/v1";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather background settings
    #[serde(default)]
    pub backdrop: BackdropConfig,
}

/// Media-search settings for the weather background.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackdropConfig {
    /// API key for the media-search service. When unset, `GIPHY_API_KEY` is
    /// consulted; with neither, backgrounds come from the static fallback set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Root of the search API, without the `gifs/search` suffix
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,

    /// Number of candidates requested per search
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,

    /// Content rating filter
    #[serde(default = "default_rating")]
    pub rating: String,

    /// Search language
    #[serde(default = "default_language")]
    pub language: String,

    /// Prefer video renditions over animated images
    #[serde(default)]
    pub prefer_video: bool,
}

fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

fn default_result_limit() -> u32 {
    25
}

fn default_rating() -> String {
    "g".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_base_url: default_search_base_url(),
            result_limit: default_result_limit(),
            rating: default_rating(),
            language: default_language(),
            prefer_video: false,
        }
    }
}

impl BackdropConfig {
    /// The API key to use: config value first, then the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        pick_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok().as_deref())
    }
}

/// Empty or whitespace-only keys count as absent.
fn pick_api_key(configured: Option<&str>, from_env: Option<&str>) -> Option<String> {
    configured
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .or_else(|| from_env.map(str::trim).filter(|k| !k.is_empty()))
        .map(str::to_string)
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nimbus");

        Self {
            config_dir,
            backdrop: BackdropConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load()?.into_validated()
    }

    /// Validate an already-loaded configuration, failing with
    /// `ConfigError::Invalid` when there are errors and logging warnings.
    pub fn into_validated(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(
            &self.backdrop.search_base_url,
            "backdrop.search_base_url",
            &mut result,
        );

        if self.backdrop.result_limit == 0 {
            result.add_error("backdrop.result_limit", "Result limit must be greater than 0");
        } else if self.backdrop.result_limit > 50 {
            result.add_warning(
                "backdrop.result_limit",
                "Result limit above 50 is usually capped by the search API",
            );
        }

        if self.backdrop.rating.trim().is_empty() {
            result.add_error("backdrop.rating", "Rating must not be empty");
        }

        if self.backdrop.language.trim().is_empty() {
            result.add_error("backdrop.language", "Language must not be empty");
        }

        if self.backdrop.resolved_api_key().is_none() {
            result.add_warning(
                "backdrop.api_key",
                "No media-search API key configured - using static fallback backgrounds",
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("user config directory".to_string()))?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_search_url() {
        let mut config = Config::default();
        config.backdrop.search_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "backdrop.search_base_url"));
    }

    #[test]
    fn test_invalid_search_url_scheme() {
        let mut config = Config::default();
        config.backdrop.search_base_url = "ftp://api.example.com/v1".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_result_limit_is_error() {
        let mut config = Config::default();
        config.backdrop.result_limit = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "backdrop.result_limit"));
    }

    #[test]
    fn test_large_result_limit_is_warning() {
        let mut config = Config::default();
        config.backdrop.result_limit = 200;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "backdrop.result_limit"));
    }

    #[test]
    fn test_configured_api_key_wins() {
        assert_eq!(
            pick_api_key(Some("from-config"), Some("from-env")).as_deref(),
            Some("from-config")
        );
    }

    #[test]
    fn test_blank_api_key_falls_through_to_env() {
        assert_eq!(pick_api_key(Some("  "), Some("from-env")).as_deref(), Some("from-env"));
        assert_eq!(pick_api_key(None, Some("")), None);
        assert_eq!(pick_api_key(None, None), None);
    }

    #[test]
    fn test_missing_backdrop_table_uses_defaults() {
        let config: Config = toml::from_str("config_dir = \"/tmp/nimbus\"\n").unwrap();
        assert_eq!(config.backdrop.search_base_url, DEFAULT_SEARCH_BASE_URL);
        assert_eq!(config.backdrop.result_limit, 25);
        assert_eq!(config.backdrop.rating, "g");
        assert_eq!(config.backdrop.language, "en");
        assert!(!config.backdrop.prefer_video);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.backdrop.result_limit, 25);
    }

    #[test]
    fn test_save_and_reload_preserves_backdrop_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.backdrop.api_key = Some("secret".to_string());
        config.backdrop.prefer_video = true;
        config.backdrop.rating = "pg".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backdrop.api_key.as_deref(), Some("secret"));
        assert!(loaded.backdrop.prefer_video);
        assert_eq!(loaded.backdrop.rating, "pg");
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backdrop\nresult_limit = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_into_validated_rejects_invalid_config() {
        let mut config = Config::default();
        config.backdrop.result_limit = 0;

        let err = config.into_validated().unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Invalid(summary)) => {
                assert!(summary.contains("backdrop.result_limit"))
            }
            other => panic!("expected ConfigError::Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
