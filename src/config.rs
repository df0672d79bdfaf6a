//! Configuration loader for the `coldwatch` backend service.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Consolidating configuration here avoids
//! scattering `env::var` calls throughout the codebase.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Parse an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PostgreSQL connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Port the HTTP ingestion/query API binds to.
    pub http_port: u16,

    /// Topic namespace on the live bus, e.g. `coldstorage` yields
    /// `coldstorage/+/readings` and `coldstorage/alerts`.
    pub topic_namespace: String,

    /// Buffer capacity of the live bus broadcast channel.
    pub bus_capacity: u32,

    /// Per-step timeout for suspending store operations, in milliseconds.
    pub store_timeout_ms: u32,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `DATABASE_URL` – PostgreSQL connection string
///
/// Optional:
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `HTTP_PORT` – API port (default: 8080)
/// - `TOPIC_NAMESPACE` – live bus topic namespace (default: `coldstorage`)
/// - `BUS_CAPACITY` – broadcast buffer size (default: 1024)
/// - `STORE_TIMEOUT_MS` – per-step store timeout (default: 5000)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = require_env!("DATABASE_URL");
    let db_pool_max = parse_env_u32!("DB_POOL_MAX", 5);
    let http_port = u16::try_from(parse_env_u32!("HTTP_PORT", 8080))
        .map_err(|_| anyhow!("Invalid HTTP_PORT: must be between 0 and 65535"))?;
    let topic_namespace = env_or!("TOPIC_NAMESPACE", "coldstorage");
    let bus_capacity = parse_env_u32!("BUS_CAPACITY", 1024);
    let store_timeout_ms = parse_env_u32!("STORE_TIMEOUT_MS", 5000);

    Ok(Config {
        db_url,
        db_pool_max,
        http_port,
        topic_namespace,
        bus_capacity,
        store_timeout_ms,
    })
}

impl Config {
    /// Per-step store timeout as a [`Duration`].
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(u64::from(self.store_timeout_ms))
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks sensitive information like database passwords while showing
    /// all configuration values that were loaded.
    pub fn log_config(&self) {
        // ---
        // Mask the password in the database URL for security
        let masked_db_url = if let Some(at_pos) = self.db_url.rfind('@') {
            if let Some(colon_pos) = self.db_url[..at_pos].rfind(':') {
                format!(
                    "{}:****{}",
                    &self.db_url[..colon_pos],
                    &self.db_url[at_pos..]
                )
            } else {
                self.db_url.clone()
            }
        } else {
            self.db_url.clone()
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL     : {}", masked_db_url);
        tracing::info!("  DB_POOL_MAX      : {}", self.db_pool_max);
        tracing::info!("  HTTP_PORT        : {}", self.http_port);
        tracing::info!("  TOPIC_NAMESPACE  : {}", self.topic_namespace);
        tracing::info!("  BUS_CAPACITY     : {}", self.bus_capacity);
        tracing::info!("  STORE_TIMEOUT_MS : {}", self.store_timeout_ms);
    }
}
