//! Prediction accuracy aggregation
//!
//! Aggregates settled predictions into accuracy statistics: overall,
//! favorite/underdog outcome split, and a comparison against the winner
//! implied by the AP poll. Predictions always back the rating favorite, so
//! a correct prediction and a favorite win are the same event; the split
//! reports how often the underdog spoiled the pick.

use crate::storage::EngineStore;
use crate::types::{Game, Season, TeamId};
use serde::{Deserialize, Serialize};

/// Comparison against the AP-poll-implied winner
///
/// Only games where at least one team holds an AP rank for that week are
/// comparable; the implied winner is the lower numeric rank, and a ranked
/// team is implied over an unranked one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApComparison {
    pub comparable: usize,
    pub model_correct: usize,
    pub ap_correct: usize,
    pub model_accuracy_pct: f64,
    pub ap_accuracy_pct: f64,
}

/// Aggregated accuracy statistics over settled predictions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyReport {
    /// Predictions with a non-null `was_correct`
    pub evaluated: usize,
    pub correct: usize,
    pub accuracy_pct: f64,
    /// Evaluated games won by the rating favorite
    pub favorite_wins: usize,
    /// Evaluated games won by the underdog
    pub underdog_wins: usize,
    pub ap_baseline: Option<ApComparison>,
}

/// Accuracy aggregation over stored predictions
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyAggregator;

impl AccuracyAggregator {
    /// Accuracy across all settled predictions, optionally one season
    pub fn overall(
        &self,
        store: &dyn EngineStore,
        season: Option<Season>,
    ) -> crate::error::Result<AccuracyReport> {
        self.aggregate(store, season, None)
    }

    /// Accuracy across one team's settled predictions
    pub fn for_team(
        &self,
        store: &dyn EngineStore,
        team_id: &TeamId,
        season: Option<Season>,
    ) -> crate::error::Result<AccuracyReport> {
        self.aggregate(store, season, Some(team_id))
    }

    fn aggregate(
        &self,
        store: &dyn EngineStore,
        season: Option<Season>,
        team_filter: Option<&TeamId>,
    ) -> crate::error::Result<AccuracyReport> {
        let mut evaluated = 0;
        let mut correct = 0;
        let mut comparable = 0;
        let mut model_correct_on_comparable = 0;
        let mut ap_correct = 0;

        for prediction in store.all_predictions()? {
            let was_correct = match prediction.was_correct {
                Some(v) => v,
                None => continue,
            };

            let game = match store.get_game(&prediction.game_id)? {
                Some(g) => g,
                None => continue,
            };

            if let Some(season) = season {
                if game.season != season {
                    continue;
                }
            }
            if let Some(team_id) = team_filter {
                if game.opponent_of(team_id).is_none() {
                    continue;
                }
            }

            evaluated += 1;
            if was_correct {
                correct += 1;
            }

            if let Some(implied) = ap_implied_winner(store, &game)? {
                comparable += 1;
                if was_correct {
                    model_correct_on_comparable += 1;
                }
                if &implied == game.winner_id() {
                    ap_correct += 1;
                }
            }
        }

        let ap_baseline = if comparable > 0 {
            Some(ApComparison {
                comparable,
                model_correct: model_correct_on_comparable,
                ap_correct,
                model_accuracy_pct: percentage(model_correct_on_comparable, comparable),
                ap_accuracy_pct: percentage(ap_correct, comparable),
            })
        } else {
            None
        };

        Ok(AccuracyReport {
            evaluated,
            correct,
            accuracy_pct: percentage(correct, evaluated),
            favorite_wins: correct,
            underdog_wins: evaluated - correct,
            ap_baseline,
        })
    }
}

/// The winner implied by the AP poll for a game's week, if comparable
fn ap_implied_winner(
    store: &dyn EngineStore,
    game: &Game,
) -> crate::error::Result<Option<TeamId>> {
    let home_rank = store.ap_rank(&game.home_team, game.season, game.week)?;
    let away_rank = store.ap_rank(&game.away_team, game.season, game.week)?;

    Ok(match (home_rank, away_rank) {
        (Some(h), Some(a)) => {
            if h <= a {
                Some(game.home_team.clone())
            } else {
                Some(game.away_team.clone())
            }
        }
        (Some(_), None) => Some(game.home_team.clone()),
        (None, Some(_)) => Some(game.away_team.clone()),
        (None, None) => None,
    })
}

fn percentage(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{GameStore, MemoryStore, PollStore, PredictionStore, TeamStore};
    use crate::types::{
        ApPollEntry, ConferenceTier, ConfidenceTier, GameClassification, Prediction, Team, Week,
    };
    use crate::utils::{current_timestamp, generate_game_id};

    fn team(id: &str, rating: f64) -> Team {
        let mut team = Team::new(id.to_string(), id.to_string(), ConferenceTier::PowerFive);
        team.rating = rating;
        team.initial_rating = rating;
        team
    }

    fn processed_game(home: &str, away: &str, home_score: u16, away_score: u16, week: Week) -> Game {
        Game {
            id: generate_game_id(),
            season: 2025,
            week,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score,
            away_score,
            quarter_scores: None,
            neutral_site: false,
            classification: GameClassification::Regular,
            is_processed: true,
            excluded_from_rankings: false,
            home_rating_change: Some(10.0),
            away_rating_change: Some(-10.0),
        }
    }

    fn settled_prediction(game: &Game, predicted_winner: &str, was_correct: bool) -> Prediction {
        Prediction {
            game_id: game.id,
            predicted_winner: predicted_winner.to_string(),
            predicted_home_score: 31,
            predicted_away_score: 24,
            home_win_probability: 65,
            away_win_probability: 35,
            confidence: ConfidenceTier::Medium,
            home_rating_used: 1600.0,
            away_rating_used: 1500.0,
            was_correct: Some(was_correct),
            created_at: current_timestamp(),
        }
    }

    fn seed(store: &MemoryStore) -> (Game, Game, Game) {
        store.upsert_team(team("a", 1700.0)).unwrap();
        store.upsert_team(team("b", 1600.0)).unwrap();
        store.upsert_team(team("c", 1500.0)).unwrap();

        let g1 = processed_game("a", "b", 28, 14, 1); // a wins
        let g2 = processed_game("b", "c", 17, 20, 2); // c wins
        let g3 = processed_game("a", "c", 35, 7, 3); // a wins
        store.upsert_game(g1.clone()).unwrap();
        store.upsert_game(g2.clone()).unwrap();
        store.upsert_game(g3.clone()).unwrap();

        store
            .upsert_prediction(settled_prediction(&g1, "a", true))
            .unwrap();
        store
            .upsert_prediction(settled_prediction(&g2, "b", false))
            .unwrap();
        store
            .upsert_prediction(settled_prediction(&g3, "a", true))
            .unwrap();

        (g1, g2, g3)
    }

    #[test]
    fn test_overall_accuracy() {
        let store = MemoryStore::new();
        seed(&store);

        let report = AccuracyAggregator.overall(&store, Some(2025)).unwrap();
        assert_eq!(report.evaluated, 3);
        assert_eq!(report.correct, 2);
        assert!((report.accuracy_pct - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.favorite_wins, 2);
        assert_eq!(report.underdog_wins, 1);
        assert!(report.ap_baseline.is_none());
    }

    #[test]
    fn test_unsettled_predictions_are_ignored() {
        let store = MemoryStore::new();
        let (g1, _, _) = seed(&store);

        let mut pending = settled_prediction(&g1, "a", true);
        pending.game_id = generate_game_id();
        pending.was_correct = None;
        let mut extra_game = processed_game("a", "b", 10, 3, 4);
        extra_game.id = pending.game_id;
        extra_game.is_processed = false;
        store.upsert_game(extra_game).unwrap();
        store.upsert_prediction(pending).unwrap();

        let report = AccuracyAggregator.overall(&store, Some(2025)).unwrap();
        assert_eq!(report.evaluated, 3);
    }

    #[test]
    fn test_team_accuracy_filters_games() {
        let store = MemoryStore::new();
        seed(&store);

        let report = AccuracyAggregator
            .for_team(&store, &"c".to_string(), Some(2025))
            .unwrap();
        // c played g2 (prediction wrong) and g3 (prediction right)
        assert_eq!(report.evaluated, 2);
        assert_eq!(report.correct, 1);
        assert_eq!(report.accuracy_pct, 50.0);
    }

    #[test]
    fn test_ap_baseline_comparison() {
        let store = MemoryStore::new();
        let (g1, g2, _) = seed(&store);

        // Week 1: both ranked, AP implies a (rank 2 < rank 9): correct.
        store
            .upsert_ap_rank(ApPollEntry {
                team_id: "a".to_string(),
                season: 2025,
                week: g1.week,
                rank: 2,
            })
            .unwrap();
        store
            .upsert_ap_rank(ApPollEntry {
                team_id: "b".to_string(),
                season: 2025,
                week: g1.week,
                rank: 9,
            })
            .unwrap();

        // Week 2: only b ranked, AP implies b; c actually won: incorrect.
        store
            .upsert_ap_rank(ApPollEntry {
                team_id: "b".to_string(),
                season: 2025,
                week: g2.week,
                rank: 14,
            })
            .unwrap();

        let report = AccuracyAggregator.overall(&store, Some(2025)).unwrap();
        let ap = report.ap_baseline.unwrap();
        // g3 has no ranked teams and is not comparable
        assert_eq!(ap.comparable, 2);
        assert_eq!(ap.ap_correct, 1);
        assert_eq!(ap.model_correct, 1); // g1 right, g2 wrong
        assert_eq!(ap.ap_accuracy_pct, 50.0);
        assert_eq!(ap.model_accuracy_pct, 50.0);
    }

    #[test]
    fn test_empty_store_reports_zeros() {
        let store = MemoryStore::new();
        let report = AccuracyAggregator.overall(&store, None).unwrap();
        assert_eq!(report.evaluated, 0);
        assert_eq!(report.accuracy_pct, 0.0);
    }
}
