//! Main application configuration
//!
//! This module defines the primary configuration structures for the rating
//! engine, including environment variable loading and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "gridiron-ratings".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }

        // Rating settings
        if let Ok(k) = env::var("K_FACTOR") {
            config.rating.k_factor = k
                .parse()
                .map_err(|_| anyhow!("Invalid K_FACTOR value: {}", k))?;
        }
        if let Ok(hfa) = env::var("HOME_FIELD_ADVANTAGE") {
            config.rating.home_field_advantage = hfa
                .parse()
                .map_err(|_| anyhow!("Invalid HOME_FIELD_ADVANTAGE value: {}", hfa))?;
        }
        if let Ok(cap) = env::var("MOV_CAP") {
            config.rating.mov_cap = cap
                .parse()
                .map_err(|_| anyhow!("Invalid MOV_CAP value: {}", cap))?;
        }
        if let Ok(threshold) = env::var("GARBAGE_TIME_THRESHOLD") {
            config.rating.garbage_time_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("Invalid GARBAGE_TIME_THRESHOLD value: {}", threshold))?;
        }
        if let Ok(weight) = env::var("GARBAGE_TIME_WEIGHT") {
            config.rating.garbage_time_weight = weight
                .parse()
                .map_err(|_| anyhow!("Invalid GARBAGE_TIME_WEIGHT value: {}", weight))?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.name.is_empty() {
        return Err(anyhow!("Service name cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}
