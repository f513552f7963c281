//! Margin-of-victory weighting
//!
//! The legacy multiplier log-scales the final point differential. The
//! quarter-weighted variant discounts fourth-quarter scoring once the game
//! was already decided through three quarters, so garbage-time points do
//! not mask a blowout (or manufacture one).

use crate::config::RatingConfig;
use crate::types::QuarterScores;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which path produced the multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovSource {
    /// Final-score differential only (no quarter data supplied)
    Legacy,
    /// Quarter differentials with garbage-time weighting applied
    QuarterWeighted,
    /// Quarter data was present but inconsistent with the final score
    QuarterFallback,
}

/// Outcome of a margin-of-victory evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovResult {
    pub multiplier: f64,
    pub source: MovSource,
    /// Whether the Q4 differential was discounted as garbage time
    pub garbage_time: bool,
}

/// Margin-of-victory evaluator
#[derive(Debug, Clone, Copy)]
pub struct MarginOfVictoryEvaluator {
    cap: f64,
    garbage_time_threshold: i32,
    garbage_time_weight: f64,
}

impl MarginOfVictoryEvaluator {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            cap: config.mov_cap,
            garbage_time_threshold: config.garbage_time_threshold,
            garbage_time_weight: config.garbage_time_weight,
        }
    }

    /// Legacy multiplier: `min(ln(diff + 1), cap)` for a positive
    /// differential, 1.0 otherwise.
    pub fn legacy(&self, point_diff: i32) -> f64 {
        self.log_and_cap(point_diff.abs() as f64)
    }

    /// Evaluate the multiplier for a final score, using quarter data when it
    /// is present and internally consistent.
    ///
    /// Inconsistent quarter data is discarded (with a warning) rather than
    /// failing the game; the result records which path was taken.
    pub fn evaluate(
        &self,
        home_score: u16,
        away_score: u16,
        quarter_scores: Option<&QuarterScores>,
    ) -> MovResult {
        let final_diff = (home_score as i32 - away_score as i32).abs();

        let quarters = match quarter_scores {
            Some(q) if q.matches_final(home_score, away_score) => q,
            Some(_) => {
                warn!(
                    home_score,
                    away_score, "quarter scores do not sum to the final; using legacy MOV"
                );
                return MovResult {
                    multiplier: self.legacy(final_diff),
                    source: MovSource::QuarterFallback,
                    garbage_time: false,
                };
            }
            None => {
                return MovResult {
                    multiplier: self.legacy(final_diff),
                    source: MovSource::Legacy,
                    garbage_time: false,
                };
            }
        };

        // Quarter differentials from the winner's perspective
        let home_won = home_score > away_score;
        let diff = |q: usize| -> i32 {
            let d = quarters.home[q] as i32 - quarters.away[q] as i32;
            if home_won {
                d
            } else {
                -d
            }
        };

        let through_three = diff(0) + diff(1) + diff(2);
        // Strictly greater than the threshold flags garbage time; exactly at
        // the threshold does not.
        let garbage_time = through_three > self.garbage_time_threshold;
        let q4_weight = if garbage_time {
            self.garbage_time_weight
        } else {
            1.0
        };

        let weighted_sum = through_three as f64 + diff(3) as f64 * q4_weight;

        MovResult {
            multiplier: self.log_and_cap(weighted_sum),
            source: MovSource::QuarterWeighted,
            garbage_time,
        }
    }

    fn log_and_cap(&self, diff: f64) -> f64 {
        if diff > 0.0 {
            (diff + 1.0).ln().min(self.cap)
        } else {
            1.0
        }
    }
}
