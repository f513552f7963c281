//! Conference-tier multipliers
//!
//! Cross-tier results scale the winner's and loser's deltas asymmetrically,
//! so cross-tier games are intentionally not zero-sum. Same-tier games use
//! (1.0, 1.0) and remain zero-sum.

use crate::types::ConferenceTier;

/// Tier-matchup scaling for rating deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct ConferenceMultiplier;

impl ConferenceMultiplier {
    /// (winner multiplier, loser multiplier) for a tier matchup
    pub fn multipliers(winner: ConferenceTier, loser: ConferenceTier) -> (f64, f64) {
        use ConferenceTier::*;

        match (winner, loser) {
            (PowerFive, PowerFive) | (GroupOfFive, GroupOfFive) | (Fcs, Fcs) => (1.0, 1.0),
            (PowerFive, GroupOfFive) => (0.9, 1.1),
            (GroupOfFive, PowerFive) => (1.1, 0.9),
            (PowerFive, Fcs) | (GroupOfFive, Fcs) => (0.5, 2.0),
            (Fcs, PowerFive) | (Fcs, GroupOfFive) => (2.0, 0.5),
        }
    }
}
