//! Prediction generation and settlement
//!
//! Predictions are generated only for unprocessed games between rated
//! teams; unrated (placeholder) teams silently skip the game. Settlement
//! sets `was_correct` exactly once and is idempotent after that.

use crate::config::RatingConfig;
use crate::error::RatingEngineError;
use crate::rating::expected::ExpectedScoreCalculator;
use crate::storage::EngineStore;
use crate::types::{
    ConfidenceTier, Game, GameId, Prediction, PredictionView, Season, TeamId, Week,
};
use crate::utils::{current_timestamp, rating_difference};
use tracing::debug;

/// Which games of a season to predict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredictionScope {
    /// A specific week
    Week(Week),
    /// The earliest week with unprocessed, rankable games
    NextWeek,
    /// All remaining games of one team
    Team(TeamId),
}

/// Pregame win/score prediction engine
#[derive(Debug, Clone, Copy)]
pub struct PredictionEngine {
    expected: ExpectedScoreCalculator,
    baseline_points: f64,
    points_per_400: f64,
    max_predicted_score: f64,
}

impl PredictionEngine {
    pub fn new(config: &RatingConfig) -> Self {
        Self {
            expected: ExpectedScoreCalculator::new(config),
            baseline_points: config.baseline_points,
            points_per_400: config.points_per_400,
            max_predicted_score: config.max_predicted_score,
        }
    }

    /// Generate and store a prediction for one game
    ///
    /// Returns `None` (without error) when the game is already processed or
    /// either team has no usable rating; regenerating for a still-unprocessed
    /// game replaces the stored prediction.
    pub fn generate(
        &self,
        store: &dyn EngineStore,
        game: &Game,
    ) -> crate::error::Result<Option<Prediction>> {
        if game.is_processed {
            debug!(game_id = %game.id, "game already processed; not predicting");
            return Ok(None);
        }

        let home = store.get_team(&game.home_team)?.ok_or_else(|| {
            RatingEngineError::TeamNotFound {
                team_id: game.home_team.clone(),
            }
        })?;
        let away = store.get_team(&game.away_team)?.ok_or_else(|| {
            RatingEngineError::TeamNotFound {
                team_id: game.away_team.clone(),
            }
        })?;

        if !home.is_rated() || !away.is_rated() {
            debug!(
                game_id = %game.id,
                home = %home.id,
                away = %away.id,
                "skipping prediction for unrated team"
            );
            return Ok(None);
        }

        let (home_eff, away_eff) =
            self.expected
                .effective_ratings(home.rating, away.rating, game.neutral_site);
        let (home_pct, away_pct) =
            self.expected
                .win_percentages(home.rating, away.rating, game.neutral_site);

        // Favorite by effective rating; an exact tie goes to the home side.
        let home_favored = home_eff >= away_eff;
        let predicted_winner = if home_favored {
            home.id.clone()
        } else {
            away.id.clone()
        };

        let shift = rating_difference(home_eff, away_eff) / 400.0 * self.points_per_400;
        let favorite_score = self.clamp_score(self.baseline_points + shift);
        let underdog_score = self.clamp_score(self.baseline_points - shift);
        let (predicted_home_score, predicted_away_score) = if home_favored {
            (favorite_score, underdog_score)
        } else {
            (underdog_score, favorite_score)
        };

        let prediction = Prediction {
            game_id: game.id,
            predicted_winner,
            predicted_home_score,
            predicted_away_score,
            home_win_probability: home_pct,
            away_win_probability: away_pct,
            confidence: confidence_from_probability(home_pct),
            home_rating_used: home.rating,
            away_rating_used: away.rating,
            was_correct: None,
            created_at: current_timestamp(),
        };

        store.upsert_prediction(prediction.clone())?;
        Ok(Some(prediction))
    }

    /// Generate predictions for a slice of a season
    ///
    /// Processed and excluded games are skipped; skipped unrated matchups do
    /// not abort the batch.
    pub fn generate_for_scope(
        &self,
        store: &dyn EngineStore,
        season: Season,
        scope: &PredictionScope,
    ) -> crate::error::Result<Vec<PredictionView>> {
        let games = store.games_for_season(season)?;

        let target_week = match scope {
            PredictionScope::NextWeek => games
                .iter()
                .filter(|g| !g.is_processed && !g.excluded_from_rankings)
                .map(|g| g.week)
                .min(),
            PredictionScope::Week(week) => Some(*week),
            PredictionScope::Team(_) => None,
        };

        let mut views = Vec::new();
        for game in games {
            if game.is_processed || game.excluded_from_rankings {
                continue;
            }

            let in_scope = match scope {
                PredictionScope::Week(_) | PredictionScope::NextWeek => {
                    Some(game.week) == target_week
                }
                PredictionScope::Team(team_id) => game.opponent_of(team_id).is_some(),
            };
            if !in_scope {
                continue;
            }

            if let Some(prediction) = self.generate(store, &game)? {
                views.push(PredictionView {
                    game_id: game.id,
                    season: game.season,
                    week: game.week,
                    home_team: game.home_team.clone(),
                    away_team: game.away_team.clone(),
                    prediction,
                });
            }
        }

        Ok(views)
    }

    /// Settle the prediction for a processed game
    ///
    /// Returns `None` when no prediction exists. `was_correct` is set
    /// exactly once; later calls return the stored prediction unchanged.
    pub fn evaluate(
        &self,
        store: &dyn EngineStore,
        game_id: &GameId,
    ) -> crate::error::Result<Option<Prediction>> {
        let game = store.get_game(game_id)?.ok_or_else(|| {
            RatingEngineError::GameNotFound {
                game_id: game_id.to_string(),
            }
        })?;

        if !game.is_processed {
            return Err(RatingEngineError::GameNotProcessed {
                game_id: game_id.to_string(),
            }
            .into());
        }

        let mut prediction = match store.get_prediction(game_id)? {
            Some(p) => p,
            None => return Ok(None),
        };

        if prediction.was_correct.is_some() {
            return Ok(Some(prediction));
        }

        prediction.was_correct = Some(&prediction.predicted_winner == game.winner_id());
        store.upsert_prediction(prediction.clone())?;
        Ok(Some(prediction))
    }

    fn clamp_score(&self, points: f64) -> u16 {
        points.clamp(0.0, self.max_predicted_score).round() as u16
    }
}

/// Confidence tier from the home win percentage
fn confidence_from_probability(home_pct: u8) -> ConfidenceTier {
    let gap = (home_pct as i16 - 50).abs();
    if gap >= 30 {
        ConfidenceTier::High
    } else if gap >= 15 {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    }
}
