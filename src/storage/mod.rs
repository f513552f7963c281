//! Storage interfaces and implementations
//!
//! The engine owns only the invariants on Team/Game/Snapshot/Prediction
//! records; persistence itself is behind these traits. `MemoryStore`
//! provides the id-indexed arena used by the CLI and tests; a database
//! backend implements the same traits.

pub mod memory;

pub use memory::MemoryStore;

use crate::rating::processor::ProcessOutcome;
use crate::types::{
    ApPollEntry, Game, GameId, Prediction, RankingSnapshot, Season, Team, TeamId, Week,
};

/// Mutation applied to a game and both its teams inside one transaction
pub type GameMutation<'a> =
    dyn FnMut(&mut Game, &mut Team, &mut Team) -> crate::error::Result<ProcessOutcome> + 'a;

/// Team persistence operations
pub trait TeamStore: Send + Sync {
    fn get_team(&self, team_id: &TeamId) -> crate::error::Result<Option<Team>>;

    fn upsert_team(&self, team: Team) -> crate::error::Result<()>;

    fn all_teams(&self) -> crate::error::Result<Vec<Team>>;

    fn team_count(&self) -> crate::error::Result<usize>;
}

/// Game persistence operations
pub trait GameStore: Send + Sync {
    fn get_game(&self, game_id: &GameId) -> crate::error::Result<Option<Game>>;

    fn upsert_game(&self, game: Game) -> crate::error::Result<()>;

    /// All games of a season in chronological (week, id) order
    fn games_for_season(&self, season: Season) -> crate::error::Result<Vec<Game>>;

    /// A team's games for a season in chronological (week, id) order
    fn games_for_team(&self, team_id: &TeamId, season: Season) -> crate::error::Result<Vec<Game>>;

    /// Run `f` against the game and both teams under an exclusive critical
    /// section keyed on the game. Changes are persisted only when `f`
    /// returns `Ok`; any error rolls the whole mutation back.
    fn process_game_txn(
        &self,
        game_id: &GameId,
        f: &mut GameMutation<'_>,
    ) -> crate::error::Result<ProcessOutcome>;

    /// Reset a season for replay: clear processing state on its games and
    /// restore every involved team to its preseason rating and a 0-0
    /// record. Returns the number of games reset.
    fn reset_season(&self, season: Season) -> crate::error::Result<usize>;
}

/// Ranking snapshot persistence operations
pub trait SnapshotStore: Send + Sync {
    /// Replace all snapshot rows for (season, week). Returns the row count.
    fn replace_week_snapshots(
        &self,
        season: Season,
        week: Week,
        rows: Vec<RankingSnapshot>,
    ) -> crate::error::Result<usize>;

    fn snapshots_for_week(
        &self,
        season: Season,
        week: Week,
    ) -> crate::error::Result<Vec<RankingSnapshot>>;

    fn team_snapshot_history(
        &self,
        team_id: &TeamId,
        season: Season,
    ) -> crate::error::Result<Vec<RankingSnapshot>>;
}

/// Prediction persistence operations
pub trait PredictionStore: Send + Sync {
    fn get_prediction(&self, game_id: &GameId) -> crate::error::Result<Option<Prediction>>;

    fn upsert_prediction(&self, prediction: Prediction) -> crate::error::Result<()>;

    fn all_predictions(&self) -> crate::error::Result<Vec<Prediction>>;
}

/// AP poll rank facts, consumed only by the accuracy baseline
pub trait PollStore: Send + Sync {
    fn ap_rank(
        &self,
        team_id: &TeamId,
        season: Season,
        week: Week,
    ) -> crate::error::Result<Option<u16>>;

    fn upsert_ap_rank(&self, entry: ApPollEntry) -> crate::error::Result<()>;
}

/// Everything the engine needs from persistence
pub trait EngineStore:
    TeamStore + GameStore + SnapshotStore + PredictionStore + PollStore
{
}

impl<T: TeamStore + GameStore + SnapshotStore + PredictionStore + PollStore> EngineStore for T {}
