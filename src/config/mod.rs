use crate::core::{AppError, Result};
use serde::Deserialize;
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    /// Default look-ahead window for the upcoming-installments view, in days
    pub upcoming_window_days: u32,
    /// How often the overdue sweep runs, in seconds
    pub overdue_sweep_interval_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                upcoming_window_days: env::var("UPCOMING_WINDOW_DAYS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid UPCOMING_WINDOW_DAYS".to_string())
                    })?,
                overdue_sweep_interval_secs: env::var("OVERDUE_SWEEP_INTERVAL_SECS")
                    .unwrap_or_else(|_| "3600".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::Configuration("Invalid OVERDUE_SWEEP_INTERVAL_SECS".to_string())
                    })?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.upcoming_window_days == 0 {
            return Err(AppError::Configuration(
                "Upcoming window must be greater than 0 days".to_string(),
            ));
        }

        if self.app.overdue_sweep_interval_secs == 0 {
            return Err(AppError::Configuration(
                "Overdue sweep interval must be greater than 0 seconds".to_string(),
            ));
        }

        Ok(())
    }
}
