//! Strength-of-schedule calculation
//!
//! SOS is the average *current* rating of a team's counted opponents.
//! Only processed, non-excluded games count; a team with no qualifying
//! games has an SOS of exactly 0.0 (sentinel, not an error).

use crate::error::RatingEngineError;
use crate::storage::EngineStore;
use crate::types::{Season, TeamId};

/// Opponent-strength calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct StrengthOfScheduleCalculator;

impl StrengthOfScheduleCalculator {
    /// Average current rating of counted opponents for (team, season)
    pub fn calculate(
        &self,
        store: &dyn EngineStore,
        team_id: &TeamId,
        season: Season,
    ) -> crate::error::Result<f64> {
        let games = store.games_for_team(team_id, season)?;

        let mut total = 0.0;
        let mut count = 0u32;

        for game in games {
            if !game.is_processed || game.excluded_from_rankings {
                continue;
            }

            let opponent_id = match game.opponent_of(team_id) {
                Some(id) => id.clone(),
                None => continue,
            };

            let opponent = store.get_team(&opponent_id)?.ok_or_else(|| {
                RatingEngineError::TeamNotFound {
                    team_id: opponent_id.clone(),
                }
            })?;

            total += opponent.rating;
            count += 1;
        }

        if count == 0 {
            return Ok(0.0);
        }

        Ok(total / count as f64)
    }
}
