//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\harmonic-mix\config.toml
//! - macOS: ~/Library/Application Support/harmonic-mix/config.toml
//! - Linux: ~/.config/harmonic-mix/config.toml
//!
//! Every section is optional; missing keys take their defaults. The API key
//! can also come from the environment (see the CLI's `--api-key`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::services::{GeminiConfig, MAX_SUGGESTIONS};
use crate::services::gemini::DEFAULT_BASE_URL;
use crate::session::SessionOptions;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API credentials (keep separate for potential future encryption)
    pub credentials: Credentials,

    /// Hosted model settings
    pub services: ServicesConfig,

    /// Track analysis settings
    pub analysis: AnalysisConfig,

    /// Suggestion settings
    pub recommendation: RecommendationConfig,
}

/// API credentials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Google Gemini API key
    pub gemini_api_key: Option<String>,
}

/// Gemini endpoint and model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub base_url: String,

    /// Model used to analyze file names
    pub analysis_model: String,

    /// Model used for next-track suggestions
    pub recommendation_model: String,

    /// Per-request timeout
    pub request_timeout_secs: u64,

    /// Minimum spacing between request starts (0 = no spacing)
    pub min_request_interval_ms: u64,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            recommendation_model: "gemini-2.5-pro".to_string(),
            request_timeout_secs: 60,
            min_request_interval_ms: 0,
        }
    }
}

impl ServicesConfig {
    /// Client settings for `api_key`.
    pub fn gemini(&self, api_key: impl Into<String>) -> GeminiConfig {
        GeminiConfig {
            base_url: self.base_url.clone(),
            analysis_model: self.analysis_model.clone(),
            recommendation_model: self.recommendation_model.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            min_request_interval: Duration::from_millis(self.min_request_interval_ms),
            ..GeminiConfig::new(api_key)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Analyzer calls in flight per batch (1 = one file at a time)
    pub concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { concurrency: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Suggestions kept per request (at most 3)
    pub max_suggestions: usize,

    /// Re-order suggestions by the harmonic-mixing score
    pub rerank_by_harmony: bool,

    /// Use the local rule-based recommender instead of Gemini
    pub offline: bool,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            max_suggestions: MAX_SUGGESTIONS,
            rerank_by_harmony: false,
            offline: false,
        }
    }
}

impl RecommendationConfig {
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            max_suggestions: self.max_suggestions.min(MAX_SUGGESTIONS),
            rerank_by_harmony: self.rerank_by_harmony,
        }
    }
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("harmonic-mix"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location.
///
/// Returns default config if the file doesn't exist or can't be parsed.
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };
    load_from(&path)
}

/// Load configuration from `path`, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to the default location.
pub fn save(config: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)?;
    Ok(path)
}

/// Save configuration to `path`.
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path).map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
