//! Configuration management for the HealthSync agent
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: HSYNC__)
//!
//! The server URL and API token configured here are only a bootstrap: at
//! startup they are seeded into the settings store, which remains the single
//! source the orchestrator reads.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sync: SyncConfig,
    pub store: StoreConfig,
}

/// Remote endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the sync server; `/sync` is appended at submission time
    pub url: String,
    /// API key sent as `X-Api-Key`
    pub token: String,
}

/// Sync scheduling and transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub interval_minutes: u64,
    pub http_timeout_secs: u64,
}

/// Settings store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                url: String::new(),
                token: String::new(),
            },
            sync: SyncConfig {
                interval_minutes: 30,
                http_timeout_secs: 20,
            },
            store: StoreConfig {
                path: "healthsync-state.json".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with HSYNC__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (HSYNC__ prefix)
            // e.g., HSYNC__SERVER__URL=https://h.example sets server.url
            .add_source(config::Environment::with_prefix("HSYNC").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.server.url.is_empty());
        assert!(config.server.token.is_empty());
        assert_eq!(config.sync.interval_minutes, 30);
        assert_eq!(config.sync.http_timeout_secs, 20);
        assert_eq!(config.store.path, "healthsync-state.json");
    }

    #[test]
    fn test_is_production() {
        // Default should be false (development)
        assert!(!AppConfig::is_production());
    }
}
