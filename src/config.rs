//! Configuration management for the Biblioteca client

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    /// File holding the serialized principal
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PaginationConfig {
    pub books_per_page: usize,
    pub staff_loans_per_page: usize,
    pub patron_loans_per_page: usize,
    pub users_per_page: usize,
    pub reservations_per_page: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Optional shared configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables: BIBLIOTECA_<SECTION>__<KEY>
            .add_source(
                Environment::with_prefix("BIBLIOTECA")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Override backend URL from BIBLIOTECA_API_URL env var if present
            .set_override_option("api.base_url", env::var("BIBLIOTECA_API_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SessionConfig {
    /// Default session file path
    /// - Linux/macOS/Windows: `<config dir>/biblioteca/session.json`
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("biblioteca").join("session.json")
        } else if let Some(home_dir) = dirs::home_dir() {
            home_dir.join(".biblioteca").join("session.json")
        } else {
            PathBuf::from(".biblioteca").join("session.json")
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:15001".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            books_per_page: 12,
            staff_loans_per_page: 5,
            patron_loans_per_page: 6,
            users_per_page: 10,
            reservations_per_page: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
