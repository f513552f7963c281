//! Preseason rating model
//!
//! Initial ratings are a pure function of conference tier, recruiting and
//! transfer portal class ranks, and returning production. Tier bonuses use
//! first-matching inclusive brackets.

use crate::types::ConferenceTier;

/// Base rating for FBS (P5 and G5) teams
pub const FBS_BASE_RATING: f64 = 1500.0;

/// Base rating for FCS teams
pub const FCS_BASE_RATING: f64 = 1300.0;

/// Pure preseason rating calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct PreseasonRatingModel;

impl PreseasonRatingModel {
    /// Calculate the preseason rating for a team
    ///
    /// Deterministic and side-effect-free: identical inputs always produce
    /// the same rating.
    pub fn calculate(
        tier: ConferenceTier,
        recruiting_rank: Option<u16>,
        transfer_rank: Option<u16>,
        returning_production: f64,
    ) -> f64 {
        let base = match tier {
            ConferenceTier::PowerFive | ConferenceTier::GroupOfFive => FBS_BASE_RATING,
            ConferenceTier::Fcs => FCS_BASE_RATING,
        };

        base + Self::recruiting_bonus(recruiting_rank)
            + Self::transfer_bonus(transfer_rank)
            + Self::returning_production_bonus(returning_production)
    }

    fn recruiting_bonus(rank: Option<u16>) -> f64 {
        match rank {
            Some(r) if r <= 5 => 200.0,
            Some(r) if r <= 10 => 150.0,
            Some(r) if r <= 25 => 100.0,
            Some(r) if r <= 50 => 50.0,
            Some(r) if r <= 75 => 25.0,
            _ => 0.0,
        }
    }

    fn transfer_bonus(rank: Option<u16>) -> f64 {
        match rank {
            Some(r) if r <= 5 => 100.0,
            Some(r) if r <= 10 => 75.0,
            Some(r) if r <= 25 => 50.0,
            Some(r) if r <= 50 => 25.0,
            _ => 0.0,
        }
    }

    fn returning_production_bonus(fraction: f64) -> f64 {
        if fraction >= 0.80 {
            40.0
        } else if fraction >= 0.60 {
            25.0
        } else if fraction >= 0.40 {
            10.0
        } else {
            0.0
        }
    }
}
