//! Configuration loading and resolution
//!
//! Bootstrap settings are resolved per key in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing TOML file is not an error: a warning is logged and defaults apply.

use crate::models::BookSeed;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const ENV_CONFIG_FILE: &str = "SHELF_CONFIG";
/// Environment variable overriding the database path
pub const ENV_DATABASE_PATH: &str = "SHELF_DATABASE_PATH";
/// Environment variable overriding the listen address
pub const ENV_BIND_ADDRESS: &str = "SHELF_BIND_ADDRESS";
/// Environment variable overriding the bibliographic API base URL
pub const ENV_OPENLIBRARY_URL: &str = "SHELF_OPENLIBRARY_URL";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_OPENLIBRARY_URL: &str = "https://openlibrary.org";
const DEFAULT_COVERS_URL: &str = "https://covers.openlibrary.org";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 4;

/// Bootstrap configuration as read from the TOML file
///
/// Every key is optional; absent keys fall through to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP listen address, e.g. "127.0.0.1:3000"
    #[serde(default)]
    pub bind_address: Option<String>,

    /// Base URL of the bibliographic search/detail API
    #[serde(default)]
    pub openlibrary_base_url: Option<String>,

    /// Base URL of the cover image host
    #[serde(default)]
    pub covers_base_url: Option<String>,

    /// Timeout applied to each outbound request
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on concurrently reconciled seeds
    #[serde(default)]
    pub max_concurrent_fetches: Option<usize>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tracked books; the built-in list is used when empty
    #[serde(default)]
    pub seeds: Vec<BookSeed>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub bind_address: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub database_path: PathBuf,
    pub bind_address: String,
    pub openlibrary_base_url: String,
    pub covers_base_url: String,
    pub request_timeout_secs: u64,
    pub max_concurrent_fetches: usize,
    pub log_level: String,
    pub seeds: Vec<BookSeed>,
}

impl CatalogConfig {
    /// Resolve configuration from CLI overrides, environment, TOML and defaults
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let config_path = overrides
            .config_file
            .clone()
            .or_else(|| std::env::var(ENV_CONFIG_FILE).ok().map(PathBuf::from))
            .or_else(default_config_path);

        let toml_config = match config_path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                load_toml_config(&path)?
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using defaults",
                    path.display()
                );
                TomlConfig::default()
            }
            None => {
                warn!("Could not determine config directory, using defaults");
                TomlConfig::default()
            }
        };

        Self::from_sources(overrides, toml_config)
    }

    /// Merge CLI overrides and environment over an already-parsed TOML config
    pub fn from_sources(overrides: &ConfigOverrides, toml_config: TomlConfig) -> Result<Self> {
        let database_path = overrides
            .database_path
            .clone()
            .or_else(|| std::env::var(ENV_DATABASE_PATH).ok().map(PathBuf::from))
            .or(toml_config.database_path)
            .unwrap_or_else(default_database_path);

        let bind_address = overrides
            .bind_address
            .clone()
            .or_else(|| std::env::var(ENV_BIND_ADDRESS).ok())
            .or(toml_config.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let openlibrary_base_url = std::env::var(ENV_OPENLIBRARY_URL)
            .ok()
            .or(toml_config.openlibrary_base_url)
            .unwrap_or_else(|| DEFAULT_OPENLIBRARY_URL.to_string());

        let covers_base_url = toml_config
            .covers_base_url
            .unwrap_or_else(|| DEFAULT_COVERS_URL.to_string());

        let request_timeout_secs = toml_config
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(Error::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }

        let max_concurrent_fetches = toml_config
            .max_concurrent_fetches
            .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES);
        if max_concurrent_fetches == 0 {
            return Err(Error::Config(
                "max_concurrent_fetches must be at least 1".to_string(),
            ));
        }

        let seeds = if toml_config.seeds.is_empty() {
            default_seeds()
        } else {
            toml_config.seeds
        };

        Ok(Self {
            database_path,
            bind_address,
            openlibrary_base_url: openlibrary_base_url.trim_end_matches('/').to_string(),
            covers_base_url: covers_base_url.trim_end_matches('/').to_string(),
            request_timeout_secs,
            max_concurrent_fetches,
            log_level: toml_config.logging.level,
            seeds,
        })
    }
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}

/// Platform config file location: `<config dir>/shelf/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("shelf").join("config.toml"))
}

/// Platform database location: `<local data dir>/shelf/shelf.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("shelf"))
        .unwrap_or_else(|| PathBuf::from("./shelf_data"))
        .join("shelf.db")
}

/// Books tracked when the config file lists none
pub fn default_seeds() -> Vec<BookSeed> {
    vec![
        BookSeed::new("The Little Prince", "Antoine de Saint-Exupéry"),
        BookSeed::new("1984", "George Orwell"),
        BookSeed::new("To Kill a Mockingbird", "Harper Lee"),
        BookSeed::new("The Great Gatsby", "F. Scott Fitzgerald"),
        BookSeed::new("Pride and Prejudice", "Jane Austen"),
    ]
}
