//! Configuration management for Ensemble
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/ensemble/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};

/// Main configuration for Ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Language model configuration
    pub llm: LlmConfig,
    /// Agent behavior configuration
    #[serde(default)]
    pub agent: AgentConfig,
    /// Tool configuration
    #[serde(default)]
    pub tools: ToolsConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Language model provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider preset (openai or deepseek)
    pub provider: String,
    /// Model name sent with every completion request
    pub model: String,
    /// API base URL, including the version prefix
    pub base_url: String,
    /// Bearer token for the provider
    pub api_key: String,
    /// Maximum tokens per completion
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Agent behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum steps per agent run
    /// Default: 10
    pub max_steps: usize,
    /// Repetition count that counts as a stall
    /// Default: 2
    pub duplicate_threshold: usize,
    /// Maximum reason-act-observe rounds per act call
    /// Default: 5
    pub react_max_rounds: usize,
}

/// Tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Timeout for http_fetch requests in seconds
    pub http_timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            agent: AgentConfig::default(),
            tools: ToolsConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        let provider =
            env::var("ENSEMBLE_PROVIDER").unwrap_or_else(|_| "openai".to_string());

        let (default_base, default_model) = match provider.as_str() {
            "deepseek" => ("https://api.deepseek.com/v1", "deepseek-chat"),
            _ => ("https://api.openai.com/v1", "gpt-4"),
        };

        Self {
            model: env::var("ENSEMBLE_MODEL").unwrap_or_else(|_| default_model.to_string()),
            base_url: env::var("ENSEMBLE_BASE_URL").unwrap_or_else(|_| default_base.to_string()),
            api_key: env::var("ENSEMBLE_API_KEY").unwrap_or_default(),
            max_tokens: 4096,
            temperature: 0.0,
            timeout_secs: 120,
            provider,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            duplicate_threshold: 2,
            react_max_rounds: 5,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: 30,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: env::var("ENSEMBLE_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ensemble")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file(&Self::config_file()) {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| Error::config(format!("failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| Error::config(format!("failed to write config: {}", e)))?;

        Ok(config_path)
    }

    /// Check if a config file exists
    pub fn config_exists() -> bool {
        Self::config_file().exists()
    }

    /// Generate a default config file content for display
    pub fn default_config_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config)
            .unwrap_or_else(|_| String::from("# Error generating config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.agent.duplicate_threshold, 2);
        assert_eq!(config.agent.react_max_rounds, 5);
        assert_eq!(config.llm.max_tokens, 4096);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("base_url"));
        assert!(toml_str.contains("max_steps"));
    }

    #[test]
    fn test_config_roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::default();
        fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.agent.max_steps, config.agent.max_steps);
        assert_eq!(loaded.llm.model, config.llm.model);
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::load_from_file(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_dir() {
        let dir = Config::config_dir();
        assert!(dir.to_string_lossy().contains("ensemble"));
    }
}
