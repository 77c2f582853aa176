//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::dataset::Metric;
use crate::pipeline::{SelectionPolicy, DEFAULT_PAGE_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub selection_policy: SelectionPolicy,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/gapminder_sample.csv")
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            selection_policy: SelectionPolicy::default(),
        }
    }
}

/// Dashboard presentation settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_metric")]
    pub default_metric: Metric,
}

fn default_title() -> String {
    "World Population Data".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_metric() -> Metric {
    Metric::LifeExp
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            page_size: default_page_size(),
            default_metric: default_metric(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("worldpop").join("config.toml")),
            Some(PathBuf::from("/etc/worldpop/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Dataset overrides
        if let Some(path) = var("WORLDPOP_DATASET_PATH") {
            self.dataset.path = PathBuf::from(path);
        }
        if let Some(policy) = var("WORLDPOP_SELECTION_POLICY") {
            match SelectionPolicy::from_str(&policy) {
                Some(p) => self.dataset.selection_policy = p,
                None => tracing::warn!("Ignoring unknown selection policy: {}", policy),
            }
        }

        // API overrides
        if let Some(host) = var("WORLDPOP_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("WORLDPOP_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Logging overrides
        if let Some(level) = var("WORLDPOP_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("WORLDPOP_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Worldpop Configuration
#
# Environment variables override these settings:
# - WORLDPOP_DATASET_PATH
# - WORLDPOP_SELECTION_POLICY
# - WORLDPOP_API_HOST
# - WORLDPOP_API_PORT
# - WORLDPOP_LOG_LEVEL
# - WORLDPOP_LOG_FORMAT

[dataset]
# CSV with columns country, continent, year, lifeExp, pop, gdpPercap, iso_alpha
path = "data/gapminder_sample.csv"

# strict: reject years/continents not in the dataset
# permissive: let them through (they match no rows)
selection_policy = "strict"

[dashboard]
# Page title
title = "World Population Data"

# Table rows per page
page_size = 10

# Metric selected when the page opens: pop, lifeExp or gdpPercap
default_metric = "lifeExp"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

# Allowed CORS origins (empty allows any)
cors_origins = []

# Request timeout in seconds
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_template_parses() {
        let config = Config::from_toml(&generate_default_config()).unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("data/gapminder_sample.csv"));
        assert_eq!(config.dataset.selection_policy, SelectionPolicy::Strict);
        assert_eq!(config.dashboard.page_size, 10);
        assert_eq!(config.dashboard.default_metric, Metric::LifeExp);
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
[dataset]
selection_policy = "permissive"

[dashboard]
default_metric = "gdpPercap"
"#,
        )
        .unwrap();

        assert_eq!(config.dataset.selection_policy, SelectionPolicy::Permissive);
        assert_eq!(config.dashboard.default_metric, Metric::GdpPercap);
        assert_eq!(config.dashboard.title, "World Population Data");
        assert_eq!(config.api.host, "0.0.0.0");
    }

    #[test]
    fn test_invalid_metric_rejected() {
        let result = Config::from_toml("[dashboard]\ndefault_metric = \"gdp\"\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("WORLDPOP_DATASET_PATH", "/srv/gapminder.csv"),
            ("WORLDPOP_SELECTION_POLICY", "permissive"),
            ("WORLDPOP_API_PORT", "9000"),
            ("WORLDPOP_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.dataset.path, PathBuf::from("/srv/gapminder.csv"));
        assert_eq!(config.dataset.selection_policy, SelectionPolicy::Permissive);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 8123").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 8123);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "[api\nport = ").unwrap();
        match Config::load(bad.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, bad.path()),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
