//! Configuration settings for matscout.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub search: SearchConfig,
    pub demo: DemoConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("matscout.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("matscout/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".matscout/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("retrieval.base_url".to_string()).into());
        }
        if !self.retrieval.base_url.starts_with("http://")
            && !self.retrieval.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "retrieval.base_url must be an http(s) URL, got '{}'",
                self.retrieval.base_url
            ))
            .into());
        }
        if self.retrieval.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be > 0".to_string()).into());
        }

        if self.search.max_results_cap == 0 {
            return Err(ConfigError::Invalid("max_results_cap must be > 0".to_string()).into());
        }
        if self.search.default_max_results == 0
            || self.search.default_max_results > self.search.max_results_cap
        {
            return Err(ConfigError::Invalid(format!(
                "default_max_results must be between 1 and {}",
                self.search.max_results_cap
            ))
            .into());
        }

        Ok(())
    }

    /// Expanded demo dataset path, if one is configured.
    pub fn demo_dataset_path(&self) -> Option<PathBuf> {
        self.demo
            .dataset_path
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
    }
}

/// Live retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Base URL of the Materials Project API
    pub base_url: String,
    /// Environment variable consulted when no API key is passed explicitly
    pub api_key_env: Option<String>,
    /// Upper bound on a single live search, in seconds
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.materialsproject.org".to_string(),
            api_key_env: Some("MP_API_KEY".to_string()),
            timeout_secs: 30,
        }
    }
}

/// Search option defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Used when a request omits `max_results` or gives a non-positive value
    pub default_max_results: usize,
    /// Larger requests are clamped to this value
    pub max_results_cap: usize,
    /// Columns shown when the request selects no properties
    pub default_properties: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: 20,
            max_results_cap: 200,
            default_properties: vec!["formula_pretty".to_string()],
        }
    }
}

/// Demo dataset configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// JSON file replacing the built-in dataset
    pub dataset_path: Option<String>,
}

/// MCP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Transport type: "stdio" or "http"
    pub transport: TransportType,
    /// HTTP port (only used when transport is "http")
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: TransportType::Stdio,
            http_port: 8001,
        }
    }
}

/// Transport type enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportType {
    Stdio,
    Http,
}

impl std::str::FromStr for TransportType {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stdio" => Ok(Self::Stdio),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::Invalid(format!("unknown transport '{}'", other))),
        }
    }
}
