//! Game processor
//!
//! Orchestrates expected score, margin-of-victory weighting, and conference
//! multipliers into a single idempotent state transition per game. A game
//! moves Unprocessed -> Processed exactly once; the transition is applied
//! inside one store transaction so no partial state is ever observable.

use crate::config::RatingConfig;
use crate::error::RatingEngineError;
use crate::rating::conference::ConferenceMultiplier;
use crate::rating::expected::ExpectedScoreCalculator;
use crate::rating::mov::{MarginOfVictoryEvaluator, MovSource};
use crate::storage::EngineStore;
use crate::types::{Game, GameId, Team, TeamId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Summary of a completed rating update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedGame {
    pub game_id: GameId,
    pub winner_id: TeamId,
    pub loser_id: TeamId,
    pub winner_score: u16,
    pub loser_score: u16,
    pub home_rating_change: f64,
    pub away_rating_change: f64,
    /// Pregame win probability of the eventual winner
    pub winner_expected: f64,
    pub mov_multiplier: f64,
    pub mov_source: MovSource,
    pub garbage_time: bool,
}

/// Outcome of a processing attempt
///
/// Re-processing is benign and reported as a value, never an error; callers
/// must branch on it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessOutcome {
    Processed(ProcessedGame),
    AlreadyProcessed,
}

/// The per-game rating update engine
#[derive(Debug, Clone, Copy)]
pub struct GameProcessor {
    expected: ExpectedScoreCalculator,
    mov: MarginOfVictoryEvaluator,
    k_factor: f64,
}

impl GameProcessor {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            expected: ExpectedScoreCalculator::new(config),
            mov: MarginOfVictoryEvaluator::new(config),
            k_factor: config.k_factor,
        }
    }

    /// Process a game, updating both teams' ratings and records
    ///
    /// The whole update runs inside the store's game transaction: the
    /// processed-flag check, rating math, and write-back happen under one
    /// exclusive critical section keyed on the game, so concurrent attempts
    /// serialize and at most one applies.
    pub fn process(&self, store: &dyn EngineStore, game_id: &GameId) -> crate::error::Result<ProcessOutcome> {
        let outcome =
            store.process_game_txn(game_id, &mut |game, home, away| self.apply(game, home, away))?;

        match &outcome {
            ProcessOutcome::Processed(summary) => {
                info!(
                    game_id = %summary.game_id,
                    winner = %summary.winner_id,
                    score = format!("{}-{}", summary.winner_score, summary.loser_score),
                    mov = summary.mov_multiplier,
                    "processed game"
                );
            }
            ProcessOutcome::AlreadyProcessed => {
                debug!(game_id = %game_id, "game already processed; skipping");
            }
        }

        Ok(outcome)
    }

    /// The seven-step rating transition, applied to in-transaction copies
    fn apply(
        &self,
        game: &mut Game,
        home: &mut Team,
        away: &mut Team,
    ) -> crate::error::Result<ProcessOutcome> {
        if game.is_processed {
            return Ok(ProcessOutcome::AlreadyProcessed);
        }

        if game.excluded_from_rankings {
            return Err(RatingEngineError::ExcludedGame {
                game_id: game.id.to_string(),
            }
            .into());
        }

        if game.home_score == game.away_score {
            return Err(RatingEngineError::InvalidGameData {
                reason: format!("game {} ended in a tie; ties are not modeled", game.id),
            }
            .into());
        }

        // Step 2-3: expected scores from effective (home-field adjusted) ratings
        let home_expected =
            self.expected
                .home_win_probability(home.rating, away.rating, game.neutral_site);
        let home_won = game.home_won();
        let winner_expected = if home_won {
            home_expected
        } else {
            1.0 - home_expected
        };
        let loser_expected = 1.0 - winner_expected;

        // Step 4: MOV from the actual final score and any consistent quarter data
        let mov = self
            .mov
            .evaluate(game.home_score, game.away_score, game.quarter_scores.as_ref());

        // Step 5: conference multipliers from winner/loser tiers
        let (winner_tier, loser_tier) = if home_won {
            (home.tier, away.tier)
        } else {
            (away.tier, home.tier)
        };
        let (winner_mult, loser_mult) = ConferenceMultiplier::multipliers(winner_tier, loser_tier);

        // Step 6: deltas
        let winner_delta = self.k_factor * (1.0 - winner_expected) * mov.multiplier * winner_mult;
        let loser_delta = self.k_factor * (0.0 - loser_expected) * mov.multiplier * loser_mult;

        let (home_delta, away_delta) = if home_won {
            (winner_delta, loser_delta)
        } else {
            (loser_delta, winner_delta)
        };

        // Step 7: apply ratings, records, and mark processed
        home.rating += home_delta;
        away.rating += away_delta;
        if home_won {
            home.wins += 1;
            away.losses += 1;
        } else {
            away.wins += 1;
            home.losses += 1;
        }
        game.home_rating_change = Some(home_delta);
        game.away_rating_change = Some(away_delta);
        game.is_processed = true;

        let (winner_id, loser_id, winner_score, loser_score) = if home_won {
            (home.id.clone(), away.id.clone(), game.home_score, game.away_score)
        } else {
            (away.id.clone(), home.id.clone(), game.away_score, game.home_score)
        };

        Ok(ProcessOutcome::Processed(ProcessedGame {
            game_id: game.id,
            winner_id,
            loser_id,
            winner_score,
            loser_score,
            home_rating_change: home_delta,
            away_rating_change: away_delta,
            winner_expected,
            mov_multiplier: mov.multiplier,
            mov_source: mov.source,
            garbage_time: mov.garbage_time,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GameStore, MemoryStore, TeamStore};
    use crate::types::{ConferenceTier, GameClassification, QuarterScores};
    use crate::utils::generate_game_id;
    use std::sync::Arc;

    fn team(id: &str, tier: ConferenceTier, rating: f64) -> Team {
        let mut team = Team::new(id.to_string(), id.to_string(), tier);
        team.rating = rating;
        team.initial_rating = rating;
        team
    }

    fn game(home: &str, away: &str, home_score: u16, away_score: u16) -> Game {
        Game {
            id: generate_game_id(),
            season: 2025,
            week: 1,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score,
            away_score,
            quarter_scores: None,
            neutral_site: false,
            classification: GameClassification::Regular,
            is_processed: false,
            excluded_from_rankings: false,
            home_rating_change: None,
            away_rating_change: None,
        }
    }

    fn setup(
        home: Team,
        away: Team,
        game: Game,
    ) -> (Arc<MemoryStore>, GameProcessor, GameId) {
        let store = Arc::new(MemoryStore::new());
        store.upsert_team(home).unwrap();
        store.upsert_team(away).unwrap();
        let game_id = game.id;
        store.upsert_game(game).unwrap();

        let processor = GameProcessor::new(&RatingConfig::default());
        (store, processor, game_id)
    }

    #[test]
    fn test_same_tier_update_is_zero_sum() {
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1550.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            game("home", "away", 31, 17),
        );

        let outcome = processor.process(store.as_ref(), &game_id).unwrap();
        let summary = match outcome {
            ProcessOutcome::Processed(s) => s,
            other => panic!("expected Processed, got {:?}", other),
        };

        assert_eq!(summary.winner_id, "home");
        assert!((summary.home_rating_change + summary.away_rating_change).abs() < 1e-9);

        let home = store.get_team(&"home".to_string()).unwrap().unwrap();
        let away = store.get_team(&"away".to_string()).unwrap().unwrap();
        assert!(home.rating > 1550.0);
        assert!(away.rating < 1500.0);
        assert_eq!((home.wins, home.losses), (1, 0));
        assert_eq!((away.wins, away.losses), (0, 1));

        let stored = store.get_game(&game_id).unwrap().unwrap();
        assert!(stored.is_processed);
        assert_eq!(stored.home_rating_change, Some(summary.home_rating_change));
        assert_eq!(stored.away_rating_change, Some(summary.away_rating_change));
    }

    #[test]
    fn test_cross_tier_update_is_not_zero_sum() {
        // G5 upset of P5: winner x1.1, loser x0.9, so the deltas do not cancel.
        let (store, processor, game_id) = setup(
            team("underdog", ConferenceTier::GroupOfFive, 1450.0),
            team("favorite", ConferenceTier::PowerFive, 1650.0),
            game("underdog", "favorite", 27, 24),
        );

        let outcome = processor.process(store.as_ref(), &game_id).unwrap();
        let summary = match outcome {
            ProcessOutcome::Processed(s) => s,
            other => panic!("expected Processed, got {:?}", other),
        };

        assert_eq!(summary.winner_id, "underdog");
        let imbalance = summary.home_rating_change + summary.away_rating_change;
        assert!(imbalance.abs() > 1e-6, "cross-tier deltas should not cancel");
        // Winner boosted, loser cushioned: net change is positive
        assert!(imbalance > 0.0);
    }

    #[test]
    fn test_reprocessing_is_a_noop() {
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            game("home", "away", 21, 14),
        );

        processor.process(store.as_ref(), &game_id).unwrap();
        let home_after = store.get_team(&"home".to_string()).unwrap().unwrap();
        let away_after = store.get_team(&"away".to_string()).unwrap().unwrap();

        let second = processor.process(store.as_ref(), &game_id).unwrap();
        assert!(matches!(second, ProcessOutcome::AlreadyProcessed));

        let home_again = store.get_team(&"home".to_string()).unwrap().unwrap();
        let away_again = store.get_team(&"away".to_string()).unwrap().unwrap();
        assert_eq!(home_after.rating, home_again.rating);
        assert_eq!(away_after.rating, away_again.rating);
        assert_eq!(home_after.wins, home_again.wins);
        assert_eq!(away_after.losses, away_again.losses);
    }

    #[test]
    fn test_excluded_game_is_rejected() {
        let mut g = game("home", "away", 42, 0);
        g.excluded_from_rankings = true;
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::Fcs, 1300.0),
            g,
        );

        let result = processor.process(store.as_ref(), &game_id);
        assert!(result.is_err());

        // Nothing may have been applied
        let home = store.get_team(&"home".to_string()).unwrap().unwrap();
        assert_eq!(home.rating, 1500.0);
        assert_eq!(home.wins, 0);
        let stored = store.get_game(&game_id).unwrap().unwrap();
        assert!(!stored.is_processed);
    }

    #[test]
    fn test_missing_team_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_team(team("home", ConferenceTier::PowerFive, 1500.0))
            .unwrap();
        let g = game("home", "ghost", 28, 7);
        let game_id = g.id;
        store.upsert_game(g).unwrap();

        let processor = GameProcessor::new(&RatingConfig::default());
        assert!(processor.process(store.as_ref(), &game_id).is_err());
    }

    #[test]
    fn test_tied_score_is_rejected() {
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            game("home", "away", 24, 24),
        );

        assert!(processor.process(store.as_ref(), &game_id).is_err());
        let stored = store.get_game(&game_id).unwrap().unwrap();
        assert!(!stored.is_processed);
    }

    #[test]
    fn test_inconsistent_quarters_degrade_to_legacy() {
        let mut g = game("home", "away", 35, 10);
        g.quarter_scores = Some(QuarterScores {
            home: [7, 7, 7, 7], // 28, final says 35
            away: [10, 0, 0, 0],
        });
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            g,
        );

        let outcome = processor.process(store.as_ref(), &game_id).unwrap();
        match outcome {
            ProcessOutcome::Processed(summary) => {
                assert_eq!(summary.mov_source, MovSource::QuarterFallback);
            }
            other => panic!("expected Processed, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_time_summary_flags() {
        let mut g = game("home", "away", 22, 21);
        g.quarter_scores = Some(QuarterScores {
            home: [14, 8, 0, 0],
            away: [0, 0, 0, 21],
        });
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            g,
        );

        let outcome = processor.process(store.as_ref(), &game_id).unwrap();
        match outcome {
            ProcessOutcome::Processed(summary) => {
                assert_eq!(summary.mov_source, MovSource::QuarterWeighted);
                assert!(summary.garbage_time);
                assert_eq!(summary.mov_multiplier, 2.5);
            }
            other => panic!("expected Processed, got {:?}", other),
        }
    }

    #[test]
    fn test_neutral_site_skips_home_field() {
        // Equal teams on a neutral field: expected is exactly 0.5 for both.
        let mut g = game("home", "away", 20, 17);
        g.neutral_site = true;
        let (store, processor, game_id) = setup(
            team("home", ConferenceTier::PowerFive, 1500.0),
            team("away", ConferenceTier::PowerFive, 1500.0),
            g,
        );

        let outcome = processor.process(store.as_ref(), &game_id).unwrap();
        match outcome {
            ProcessOutcome::Processed(summary) => {
                assert!((summary.winner_expected - 0.5).abs() < 1e-12);
            }
            other => panic!("expected Processed, got {:?}", other),
        }
    }
}
