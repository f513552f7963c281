//! Rating engine constants

use serde::{Deserialize, Serialize};

/// Tunable constants for the ELO update and prediction math
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingConfig {
    /// K-factor applied to every rating update
    pub k_factor: f64,
    /// Rating bonus for the home team in non-neutral games
    pub home_field_advantage: f64,
    /// Upper bound on the margin-of-victory multiplier
    pub mov_cap: f64,
    /// Q1-Q3 differential that must be exceeded to flag garbage time
    pub garbage_time_threshold: i32,
    /// Weight applied to the Q4 differential once garbage time is flagged
    pub garbage_time_weight: f64,
    /// Symmetric baseline for predicted scores
    pub baseline_points: f64,
    /// Points shifted toward the favorite per 400 rating points
    pub points_per_400: f64,
    /// Upper clamp for predicted scores
    pub max_predicted_score: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            home_field_advantage: 65.0,
            mov_cap: 2.5,
            garbage_time_threshold: 21,
            garbage_time_weight: 0.25,
            baseline_points: 30.0,
            points_per_400: 3.5,
            max_predicted_score: 150.0,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.k_factor <= 0.0 {
            return Err(crate::error::RatingEngineError::ConfigurationError {
                message: "K-factor must be positive".to_string(),
            }
            .into());
        }

        if self.home_field_advantage < 0.0 {
            return Err(crate::error::RatingEngineError::ConfigurationError {
                message: "Home-field advantage must be non-negative".to_string(),
            }
            .into());
        }

        if self.mov_cap <= 0.0 {
            return Err(crate::error::RatingEngineError::ConfigurationError {
                message: "MOV cap must be positive".to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.garbage_time_weight) {
            return Err(crate::error::RatingEngineError::ConfigurationError {
                message: "Garbage-time weight must be within [0, 1]".to_string(),
            }
            .into());
        }

        if self.max_predicted_score <= self.baseline_points {
            return Err(crate::error::RatingEngineError::ConfigurationError {
                message: "Max predicted score must exceed the baseline".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RatingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.k_factor, 32.0);
        assert_eq!(config.home_field_advantage, 65.0);
        assert_eq!(config.mov_cap, 2.5);
        assert_eq!(config.garbage_time_threshold, 21);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = RatingConfig::default();
        config.k_factor = 0.0;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.garbage_time_weight = 1.5;
        assert!(config.validate().is_err());

        config = RatingConfig::default();
        config.max_predicted_score = 10.0;
        assert!(config.validate().is_err());
    }
}
