//! Rating engine facade
//!
//! `RatingEngine` wires the storage arena and the individual calculators
//! into the operation surface consumed by callers (CLI, batch jobs, an
//! HTTP layer). All rating mutation flows through `process_game` and
//! `replay_season`; nothing else writes team ratings.

use crate::config::RatingConfig;
use crate::error::RatingEngineError;
use crate::prediction::accuracy::{AccuracyAggregator, AccuracyReport};
use crate::prediction::engine::{PredictionEngine, PredictionScope};
use crate::rating::mov::MovSource;
use crate::rating::preseason::PreseasonRatingModel;
use crate::rating::processor::{GameProcessor, ProcessOutcome};
use crate::rankings::snapshot::RankingSnapshotService;
use crate::rankings::sos::StrengthOfScheduleCalculator;
use crate::storage::EngineStore;
use crate::types::{GameId, Prediction, PredictionView, Season, TeamId, Week};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// Counters describing engine activity
#[derive(Debug, Clone, Default)]
pub struct EngineStats {
    pub games_processed: u64,
    pub games_already_processed: u64,
    pub quarter_fallbacks: u64,
    pub garbage_time_games: u64,
    pub predictions_generated: u64,
    pub predictions_evaluated: u64,
}

/// Summary of a full-season replay
#[derive(Debug, Clone, Default)]
pub struct ReplaySummary {
    pub games_reset: usize,
    pub games_processed: usize,
    pub games_skipped: usize,
}

/// The main engine facade
#[derive(Clone)]
pub struct RatingEngine {
    store: Arc<dyn EngineStore>,
    processor: GameProcessor,
    sos: StrengthOfScheduleCalculator,
    snapshots: RankingSnapshotService,
    predictions: PredictionEngine,
    accuracy: AccuracyAggregator,
    stats: Arc<RwLock<EngineStats>>,
}

impl RatingEngine {
    /// Create a new engine over a store
    pub fn new(store: Arc<dyn EngineStore>, config: RatingConfig) -> crate::error::Result<Self> {
        config.validate()?;

        let sos = StrengthOfScheduleCalculator;
        Ok(Self {
            store,
            processor: GameProcessor::new(&config),
            sos,
            snapshots: RankingSnapshotService::new(sos),
            predictions: PredictionEngine::new(&config),
            accuracy: AccuracyAggregator,
            stats: Arc::new(RwLock::new(EngineStats::default())),
        })
    }

    /// Access the underlying store
    pub fn store(&self) -> Arc<dyn EngineStore> {
        self.store.clone()
    }

    /// Initialize a team's preseason rating
    ///
    /// Writes the calculated value to both `rating` and `initial_rating`.
    /// A team that is already initialized keeps its existing preseason
    /// rating; re-initialization happens only through `replay_season`'s
    /// reset or an explicit new-season import.
    pub fn initialize_preseason_rating(&self, team_id: &TeamId) -> crate::error::Result<f64> {
        let mut team = self.store.get_team(team_id)?.ok_or_else(|| {
            RatingEngineError::TeamNotFound {
                team_id: team_id.clone(),
            }
        })?;

        if team.initial_rating > 0.0 {
            warn!(team = %team.id, "team already initialized; keeping preseason rating");
            return Ok(team.initial_rating);
        }

        let rating = PreseasonRatingModel::calculate(
            team.tier,
            team.recruiting_rank,
            team.transfer_rank,
            team.returning_production,
        );
        team.rating = rating;
        team.initial_rating = rating;
        self.store.upsert_team(team)?;

        info!(team = %team_id, rating, "initialized preseason rating");
        Ok(rating)
    }

    /// Run the per-game rating update
    pub fn process_game(&self, game_id: &GameId) -> crate::error::Result<ProcessOutcome> {
        let outcome = self.processor.process(self.store.as_ref(), game_id)?;
        self.record_outcome(&outcome)?;
        Ok(outcome)
    }

    /// Average current rating of counted opponents
    pub fn calculate_sos(&self, team_id: &TeamId, season: Season) -> crate::error::Result<f64> {
        self.sos.calculate(self.store.as_ref(), team_id, season)
    }

    /// Persist the weekly ranking table; returns the row count
    pub fn save_weekly_rankings(&self, season: Season, week: Week) -> crate::error::Result<usize> {
        self.snapshots
            .save_weekly_rankings(self.store.as_ref(), season, week)
    }

    /// Generate predictions for a slice of a season
    pub fn generate_predictions(
        &self,
        season: Season,
        scope: &PredictionScope,
    ) -> crate::error::Result<Vec<PredictionView>> {
        let views = self
            .predictions
            .generate_for_scope(self.store.as_ref(), season, scope)?;

        let mut stats = self.stats_mut()?;
        stats.predictions_generated += views.len() as u64;
        drop(stats);

        info!(season, count = views.len(), "generated predictions");
        Ok(views)
    }

    /// Settle the prediction for a processed game
    pub fn evaluate_prediction(&self, game_id: &GameId) -> crate::error::Result<Option<Prediction>> {
        // Only first-time settlements count toward the stats; re-evaluating
        // an already-settled prediction is a read.
        let unsettled = self
            .store
            .get_prediction(game_id)?
            .is_some_and(|p| p.was_correct.is_none());

        let result = self.predictions.evaluate(self.store.as_ref(), game_id)?;
        if unsettled && result.is_some() {
            self.stats_mut()?.predictions_evaluated += 1;
        }
        Ok(result)
    }

    /// Settle every prediction of a season whose game is processed
    ///
    /// Returns the number of predictions with a settled result.
    pub fn evaluate_season(&self, season: Season) -> crate::error::Result<usize> {
        let mut settled = 0;
        for game in self.store.games_for_season(season)? {
            if !game.is_processed {
                continue;
            }
            if self.evaluate_prediction(&game.id)?.is_some() {
                settled += 1;
            }
        }
        Ok(settled)
    }

    /// Accuracy across all settled predictions
    pub fn overall_accuracy(&self, season: Option<Season>) -> crate::error::Result<AccuracyReport> {
        self.accuracy.overall(self.store.as_ref(), season)
    }

    /// Accuracy across one team's settled predictions
    pub fn team_accuracy(
        &self,
        team_id: &TeamId,
        season: Option<Season>,
    ) -> crate::error::Result<AccuracyReport> {
        self.accuracy
            .for_team(self.store.as_ref(), team_id, season)
    }

    /// Reset a season and reprocess its games chronologically
    ///
    /// Requires exclusive use of the season's teams and games for its
    /// duration; do not interleave with live single-game processing.
    /// Excluded games and unplayed fixtures are skipped, never processed.
    pub fn replay_season(&self, season: Season) -> crate::error::Result<ReplaySummary> {
        let games_reset = self.store.reset_season(season)?;
        info!(season, games_reset, "season reset; replaying chronologically");

        let mut summary = ReplaySummary {
            games_reset,
            ..Default::default()
        };

        for game in self.store.games_for_season(season)? {
            // Excluded games never process; equal scores mean an unplayed
            // fixture still on the schedule, not a tie.
            if game.excluded_from_rankings || game.home_score == game.away_score {
                summary.games_skipped += 1;
                continue;
            }

            match self.process_game(&game.id)? {
                ProcessOutcome::Processed(_) => summary.games_processed += 1,
                ProcessOutcome::AlreadyProcessed => summary.games_skipped += 1,
            }
        }

        info!(
            season,
            processed = summary.games_processed,
            skipped = summary.games_skipped,
            "season replay complete"
        );
        Ok(summary)
    }

    /// Snapshot of the engine counters
    pub fn stats(&self) -> crate::error::Result<EngineStats> {
        Ok(self
            .stats
            .read()
            .map_err(|_| RatingEngineError::InternalError {
                message: "Failed to acquire stats lock".to_string(),
            })?
            .clone())
    }

    fn record_outcome(&self, outcome: &ProcessOutcome) -> crate::error::Result<()> {
        let mut stats = self.stats_mut()?;
        match outcome {
            ProcessOutcome::Processed(summary) => {
                stats.games_processed += 1;
                if summary.mov_source == MovSource::QuarterFallback {
                    stats.quarter_fallbacks += 1;
                }
                if summary.garbage_time {
                    stats.garbage_time_games += 1;
                }
            }
            ProcessOutcome::AlreadyProcessed => {
                stats.games_already_processed += 1;
            }
        }
        Ok(())
    }

    fn stats_mut(&self) -> crate::error::Result<std::sync::RwLockWriteGuard<'_, EngineStats>> {
        self.stats
            .write()
            .map_err(|_| {
                RatingEngineError::InternalError {
                    message: "Failed to acquire stats lock".to_string(),
                }
                .into()
            })
    }
}
