//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache TTLs, the liveness probe, logging and default paths. `AppConfig`
//! is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::catalog::{CatalogError, SongCatalog, SongRecord};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Values are in seconds. Picks are never cached: each call may return a
// different song.

/// Home page and catalog listing - the catalog never changes while running
pub const HTTP_CACHE_HOME_MAX_AGE: u32 = 60;
pub const HTTP_CACHE_HOME_SWR: u32 = 30;

/// Static assets (CSS, JS) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

pub const CACHE_CONTROL_HOME: &str = formatcp!(
    "public, max-age={}, stale-while-revalidate={}",
    HTTP_CACHE_HOME_MAX_AGE,
    HTTP_CACHE_HOME_SWR
);

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Backing Store
// =============================================================================

/// No-op query used to prove the database answers
pub const LIVENESS_QUERY: &str = "SELECT 1";

/// Default connection string for the local database file
pub const DEFAULT_DATABASE_URL: &str = "file:local.db";

/// Default upper bound on a single liveness probe, in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default directory holding Tera templates
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory for static files
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Identity attached to every request by the auth stub
pub const DEFAULT_IDENTITY: &str = "demo-user";

/// Default site title
pub const DEFAULT_SITE_NAME: &str = "Song Picker";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "songpicker=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Seconds to wait for open connections on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Songs replacing the built-in catalog
    #[serde(default)]
    pub catalog: Option<Vec<SongRecord>>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, for development or behind a reverse proxy
    #[default]
    None,
    /// User-provided certificate and key files
    Manual,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string: `file:<path>`, `:memory:` or a bare path
    #[serde(default = "DatabaseConfig::default_url")]
    pub url: String,
    /// Upper bound on a single liveness probe
    #[serde(default = "DatabaseConfig::default_probe_timeout")]
    pub probe_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            probe_timeout_ms: Self::default_probe_timeout(),
        }
    }
}

impl DatabaseConfig {
    fn default_url() -> String {
        DEFAULT_DATABASE_URL.to_string()
    }

    fn default_probe_timeout() -> u64 {
        DEFAULT_PROBE_TIMEOUT_MS
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// Stub authorization settings. The identity is attached, never checked.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_identity")]
    pub identity: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            identity: Self::default_identity(),
        }
    }
}

impl AuthConfig {
    fn default_identity() -> String {
        DEFAULT_IDENTITY.to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    #[serde(default = "UiConfig::default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "UiConfig::default_static_dir")]
    pub static_dir: String,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            templates_dir: Self::default_templates_dir(),
            static_dir: Self::default_static_dir(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_templates_dir() -> String {
        DEFAULT_TEMPLATES_DIR.to_string()
    }

    fn default_static_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Glob pattern matching every template file
    pub fn template_glob(&self) -> String {
        format!("{}/**/*", self.templates_dir.trim_end_matches('/'))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format == "json"
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "database.probe_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "http.tls.mode = \"manual\" requires cert_path and key_path".to_string(),
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        if let Some(songs) = &self.catalog {
            if songs.is_empty() {
                return Err(ConfigError::Validation(
                    "catalog is present but has no songs; remove it to use the built-in catalog"
                        .to_string(),
                ));
            }
            SongCatalog::new(songs.clone())?;
        }

        Ok(())
    }

    /// The configured catalog, or the built-in one when none is configured.
    pub fn song_catalog(&self) -> Result<SongCatalog, ConfigError> {
        match &self.catalog {
            Some(songs) => Ok(SongCatalog::new(songs.clone())?),
            None => Ok(SongCatalog::builtin()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Configuration error: {0}")]
    Validation(String),
}
