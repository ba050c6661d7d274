//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::query::{QueryDescriptor, SortColumn, SortOrder, DEFAULT_PER_PAGE, MAX_PER_PAGE};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub list: ListConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Encounter API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Initial list query
#[derive(Debug, Clone, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_sort_by")]
    pub sort_by: String,

    #[serde(default = "default_sort_order")]
    pub sort_order: String,
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

fn default_sort_by() -> String {
    "intime".to_string()
}

fn default_sort_order() -> String {
    "desc".to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            sort_by: default_sort_by(),
            sort_order: default_sort_order(),
        }
    }
}

impl ListConfig {
    /// Descriptor the list starts from
    pub fn initial_descriptor(&self) -> Result<QueryDescriptor, ConfigError> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(ConfigError::Invalid {
                field: "list.per_page",
                error: format!("{} is outside 1..={}", self.per_page, MAX_PER_PAGE),
            });
        }
        let column: SortColumn = self.sort_by.parse().map_err(|e| ConfigError::Invalid {
            field: "list.sort_by",
            error: format!("{}", e),
        })?;
        let order: SortOrder = self.sort_order.parse().map_err(|e| ConfigError::Invalid {
            field: "list.sort_order",
            error: format!("{}", e),
        })?;

        Ok(QueryDescriptor::new(self.per_page).sorted(column, order))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
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
            file: None,
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
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
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Files that exist but fail to load are skipped and returned alongside
    /// the config, so the caller can report them once logging is set up.
    pub fn load_default() -> (Self, Vec<RejectedConfig>) {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("ed-explorer").join("config.toml")),
            Some(PathBuf::from("/etc/ed-explorer/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First existing path that loads cleanly, else environment defaults
    pub fn load_first(paths: &[PathBuf]) -> (Self, Vec<RejectedConfig>) {
        let mut rejected = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    return (config, rejected);
                }
                Err(error) => rejected.push(RejectedConfig {
                    path: path.clone(),
                    error,
                }),
            }
        }

        tracing::info!("Using default config with environment overrides");
        (Self::from_env(), rejected)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api.base_url",
                error: "must not be empty".to_string(),
            });
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "api.request_timeout_secs",
                error: "must be at least 1".to_string(),
            });
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Invalid {
                field: "logging.format",
                error: format!("{:?} (expected pretty or json)", self.logging.format),
            });
        }
        self.list.initial_descriptor().map(|_| ())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("ED_EXPLORER_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("ED_EXPLORER_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        // List overrides
        if let Some(per_page) = var("ED_EXPLORER_PER_PAGE") {
            if let Ok(n) = per_page.parse() {
                self.list.per_page = n;
            }
        }

        // Logging overrides
        if let Some(level) = var("ED_EXPLORER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ED_EXPLORER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// A config file that was found but not used
#[derive(Debug)]
pub struct RejectedConfig {
    pub path: PathBuf,
    pub error: ConfigError,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# ED Explorer Configuration
#
# Environment variables override these settings:
# - ED_EXPLORER_API_URL
# - ED_EXPLORER_TIMEOUT_SECS
# - ED_EXPLORER_PER_PAGE
# - ED_EXPLORER_LOG_LEVEL
# - ED_EXPLORER_LOG_FORMAT

[api]
# Base URL of the encounter API (including the /api prefix)
base_url = "http://localhost:8000/api"

# Request timeout in seconds
request_timeout_secs = 30

[list]
# Rows per page (1-100)
per_page = 20

# Initial sort column: stay_id, intime, outtime or disposition
sort_by = "intime"

# Initial sort direction: asc or desc
sort_order = "desc"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/ed-explorer/ed-explorer.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_template_parses() {
        let file = write_config(&generate_default_config());
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.list.per_page, 20);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = write_config("[list]\nsort_by = \"stay_id\"\nsort_order = \"asc\"\n");
        let config = Config::load(file.path()).unwrap();
        let descriptor = config.list.initial_descriptor().unwrap();

        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(descriptor.sort_by(), SortColumn::StayId);
        assert_eq!(descriptor.sort_order(), SortOrder::Asc);
        assert_eq!(descriptor.per_page(), 20);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let file = write_config("[list]\nper_page = 500\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { field: "list.per_page", .. })
        ));

        let file = write_config("[list]\nsort_by = \"acuity\"\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid { field: "list.sort_by", .. })
        ));

        let file = write_config("[logging]\nformat = \"xml\"\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_parse_and_io_errors() {
        let file = write_config("[api\nbase_url = ");
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));

        let missing = Path::new("/nonexistent/ed-explorer/config.toml");
        assert!(matches!(Config::load(missing), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_broken_files_are_reported_not_dropped() {
        let zero_page = write_config("[list]\nper_page = 0\n");
        let garbage = write_config("garbage = [");
        let good = write_config("[api]\nrequest_timeout_secs = 7\n");
        let missing = PathBuf::from("/nonexistent/ed-explorer/config.toml");

        let paths = vec![
            missing,
            zero_page.path().to_path_buf(),
            garbage.path().to_path_buf(),
            good.path().to_path_buf(),
        ];
        let (config, rejected) = Config::load_first(&paths);

        assert_eq!(config.api.request_timeout_secs, 7);
        assert_eq!(rejected.len(), 2);
        assert_eq!(rejected[0].path, zero_page.path());
        assert!(matches!(
            rejected[0].error,
            ConfigError::Invalid { field: "list.per_page", .. }
        ));
        assert_eq!(rejected[1].path, garbage.path());
        assert!(matches!(rejected[1].error, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_only_broken_file_falls_back_with_report() {
        let garbage = write_config("garbage = [");
        let (config, rejected) = Config::load_first(&[garbage.path().to_path_buf()]);

        assert_eq!(rejected.len(), 1);
        assert_eq!(config.list.per_page, DEFAULT_PER_PAGE);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ED_EXPLORER_API_URL", "http://ed.internal:9000/api"),
            ("ED_EXPLORER_TIMEOUT_SECS", "5"),
            ("ED_EXPLORER_PER_PAGE", "not-a-number"),
            ("ED_EXPLORER_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://ed.internal:9000/api");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(config.list.per_page, 20);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }
}
