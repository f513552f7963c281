//! Configuration management for the rating engine
//!
//! This module handles configuration loading from environment variables,
//! validation, and default values for the engine constants.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, ServiceSettings};
pub use rating::RatingConfig;
