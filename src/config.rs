/*!
 * Configuration support for the medcode service
 *
 * Provides runtime configuration for the HTTP server and dataset loading.
 */

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Global configuration for the medcode service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedcodeConfig {
    /// Host address the HTTP API binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP API binds to
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default number of results for diagnosis code searches
    #[serde(default = "default_search_limit")]
    pub default_search_limit: usize,

    /// Optional override path for the ICD-10-CM dataset (JSON)
    #[serde(default)]
    pub icd10_data: Option<PathBuf>,

    /// Optional override path for the modifier table (CSV)
    #[serde(default)]
    pub modifier_table: Option<PathBuf>,

    /// Optional override path for the NCCI pair edits (CSV)
    #[serde(default)]
    pub pair_edits: Option<PathBuf>,
}

impl Default for MedcodeConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_search_limit: default_search_limit(),
            icd10_data: None,
            modifier_table: None,
            pair_edits: None,
        }
    }
}

// Default value functions for serde
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_search_limit() -> usize {
    crate::constants::DEFAULT_SEARCH_LIMIT
}

impl MedcodeConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `MEDCODE_HOST`: bind address
    /// - `MEDCODE_PORT`: bind port
    /// - `MEDCODE_SEARCH_LIMIT`: default search result limit
    /// - `MEDCODE_ICD10_DATA`: path to an ICD-10-CM JSON file
    /// - `MEDCODE_MODIFIER_TABLE`: path to a modifier CSV file
    /// - `MEDCODE_PAIR_EDITS`: path to an NCCI pair-edit CSV file
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MEDCODE_HOST") {
            config.host = val;
        }

        if let Ok(val) = std::env::var("MEDCODE_PORT") {
            if let Ok(port) = val.parse() {
                config.port = port;
            }
        }

        if let Ok(val) = std::env::var("MEDCODE_SEARCH_LIMIT") {
            if let Ok(limit) = val.parse() {
                config.default_search_limit = limit;
            }
        }

        if let Ok(val) = std::env::var("MEDCODE_ICD10_DATA") {
            config.icd10_data = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("MEDCODE_MODIFIER_TABLE") {
            config.modifier_table = Some(PathBuf::from(val));
        }

        if let Ok(val) = std::env::var("MEDCODE_PAIR_EDITS") {
            config.pair_edits = Some(PathBuf::from(val));
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| crate::MedcodeError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::MedcodeError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/medcode/config.toml` on Unix-like systems
    /// or `%APPDATA%\medcode\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "medcode")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, environment, or defaults
    ///
    /// Priority order:
    /// 1. Default config file (if exists)
    /// 2. Environment variables
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::from_file(&config_path) {
                    return config;
                }
            }
        }

        Self::from_env()
    }

    /// Resolve the configured host and port into a socket address
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| crate::MedcodeError::Configuration {
                message: format!("Invalid listen address '{}:{}': {}", self.host, self.port, e),
                suggestion: Some("Use an IP address and port, e.g. 127.0.0.1:8080".to_string()),
            })
    }
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<MedcodeConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: MedcodeConfig) {
    *GLOBAL_CONFIG.write().unwrap() = Some(config);
}

/// Get the global configuration (or default if not set)
pub fn global_config() -> MedcodeConfig {
    GLOBAL_CONFIG.read().unwrap()
        .as_ref()
        .cloned()
        .unwrap_or_else(MedcodeConfig::load)
}

/// Clear the global configuration
pub fn clear_global_config() {
    *GLOBAL_CONFIG.write().unwrap() = None;
}

/// Builder for customizing configuration
pub struct ConfigBuilder {
    config: MedcodeConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: MedcodeConfig::default(),
        }
    }

    /// Set the bind host
    pub fn host<S: Into<String>>(mut self, host: S) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the bind port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the default search result limit
    pub fn default_search_limit(mut self, limit: usize) -> Self {
        self.config.default_search_limit = limit;
        self
    }

    /// Set the ICD-10-CM dataset override path
    pub fn icd10_data<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.icd10_data = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the modifier table override path
    pub fn modifier_table<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.modifier_table = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the pair-edit override path
    pub fn pair_edits<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.pair_edits = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the configuration
    pub fn build(self) -> MedcodeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MedcodeConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_search_limit, 5);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .host("0.0.0.0")
            .port(9090)
            .default_search_limit(10)
            .icd10_data("data/icd10.json")
            .build();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9090);
        assert_eq!(config.default_search_limit, 10);
        assert!(config.icd10_data.is_some());
    }

    #[test]
    fn test_socket_addr() {
        let config = MedcodeConfig::default();
        assert!(config.socket_addr().is_ok());

        let bad = ConfigBuilder::new().host("not an address").build();
        assert!(bad.socket_addr().is_err());
    }
}
