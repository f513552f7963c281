//! In-memory store implementation
//!
//! A single `RwLock` guards the whole arena, so reads observe a consistent
//! view of ratings and the game transaction's write lock serializes every
//! rating mutation, including games sharing a team.

use crate::error::RatingEngineError;
use crate::rating::processor::ProcessOutcome;
use crate::storage::{
    GameMutation, GameStore, PollStore, PredictionStore, SnapshotStore, TeamStore,
};
use crate::types::{
    ApPollEntry, Game, GameId, Prediction, RankingSnapshot, Season, Team, TeamId, Week,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct StoreState {
    teams: HashMap<TeamId, Team>,
    games: HashMap<GameId, Game>,
    snapshots: HashMap<(Season, Week), Vec<RankingSnapshot>>,
    predictions: HashMap<GameId, Prediction>,
    poll: HashMap<(TeamId, Season, Week), u16>,
}

/// In-memory engine store
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> crate::error::Result<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.state
            .read()
            .map_err(|_| {
                RatingEngineError::InternalError {
                    message: "Failed to acquire store read lock".to_string(),
                }
                .into()
            })
    }

    fn write(&self) -> crate::error::Result<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.state
            .write()
            .map_err(|_| {
                RatingEngineError::InternalError {
                    message: "Failed to acquire store write lock".to_string(),
                }
                .into()
            })
    }
}

fn sort_chronologically(games: &mut [Game]) {
    games.sort_by(|a, b| a.week.cmp(&b.week).then_with(|| a.id.cmp(&b.id)));
}

impl TeamStore for MemoryStore {
    fn get_team(&self, team_id: &TeamId) -> crate::error::Result<Option<Team>> {
        Ok(self.read()?.teams.get(team_id).cloned())
    }

    fn upsert_team(&self, team: Team) -> crate::error::Result<()> {
        self.write()?.teams.insert(team.id.clone(), team);
        Ok(())
    }

    fn all_teams(&self) -> crate::error::Result<Vec<Team>> {
        let mut teams: Vec<Team> = self.read()?.teams.values().cloned().collect();
        teams.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(teams)
    }

    fn team_count(&self) -> crate::error::Result<usize> {
        Ok(self.read()?.teams.len())
    }
}

impl GameStore for MemoryStore {
    fn get_game(&self, game_id: &GameId) -> crate::error::Result<Option<Game>> {
        Ok(self.read()?.games.get(game_id).cloned())
    }

    fn upsert_game(&self, game: Game) -> crate::error::Result<()> {
        self.write()?.games.insert(game.id, game);
        Ok(())
    }

    fn games_for_season(&self, season: Season) -> crate::error::Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .read()?
            .games
            .values()
            .filter(|g| g.season == season)
            .cloned()
            .collect();
        sort_chronologically(&mut games);
        Ok(games)
    }

    fn games_for_team(&self, team_id: &TeamId, season: Season) -> crate::error::Result<Vec<Game>> {
        let mut games: Vec<Game> = self
            .read()?
            .games
            .values()
            .filter(|g| g.season == season && g.opponent_of(team_id).is_some())
            .cloned()
            .collect();
        sort_chronologically(&mut games);
        Ok(games)
    }

    fn process_game_txn(
        &self,
        game_id: &GameId,
        f: &mut GameMutation<'_>,
    ) -> crate::error::Result<ProcessOutcome> {
        let mut state = self.write()?;

        let mut game = state
            .games
            .get(game_id)
            .cloned()
            .ok_or_else(|| RatingEngineError::GameNotFound {
                game_id: game_id.to_string(),
            })?;
        let mut home = state
            .teams
            .get(&game.home_team)
            .cloned()
            .ok_or_else(|| RatingEngineError::TeamNotFound {
                team_id: game.home_team.clone(),
            })?;
        let mut away = state
            .teams
            .get(&game.away_team)
            .cloned()
            .ok_or_else(|| RatingEngineError::TeamNotFound {
                team_id: game.away_team.clone(),
            })?;

        // The closure mutates copies; an error here leaves the store
        // untouched, which is the rollback guarantee.
        let outcome = f(&mut game, &mut home, &mut away)?;

        if let ProcessOutcome::Processed(_) = outcome {
            state.teams.insert(home.id.clone(), home);
            state.teams.insert(away.id.clone(), away);
            state.games.insert(game.id, game);
        }

        Ok(outcome)
    }

    fn reset_season(&self, season: Season) -> crate::error::Result<usize> {
        let mut state = self.write()?;

        let mut involved: BTreeSet<TeamId> = BTreeSet::new();
        let mut reset_count = 0;

        for game in state.games.values_mut().filter(|g| g.season == season) {
            game.is_processed = false;
            game.home_rating_change = None;
            game.away_rating_change = None;
            involved.insert(game.home_team.clone());
            involved.insert(game.away_team.clone());
            reset_count += 1;
        }

        for team_id in involved {
            if let Some(team) = state.teams.get_mut(&team_id) {
                team.rating = team.initial_rating;
                team.wins = 0;
                team.losses = 0;
            }
        }

        Ok(reset_count)
    }
}

impl SnapshotStore for MemoryStore {
    fn replace_week_snapshots(
        &self,
        season: Season,
        week: Week,
        rows: Vec<RankingSnapshot>,
    ) -> crate::error::Result<usize> {
        let count = rows.len();
        self.write()?.snapshots.insert((season, week), rows);
        Ok(count)
    }

    fn snapshots_for_week(
        &self,
        season: Season,
        week: Week,
    ) -> crate::error::Result<Vec<RankingSnapshot>> {
        Ok(self
            .read()?
            .snapshots
            .get(&(season, week))
            .cloned()
            .unwrap_or_default())
    }

    fn team_snapshot_history(
        &self,
        team_id: &TeamId,
        season: Season,
    ) -> crate::error::Result<Vec<RankingSnapshot>> {
        let state = self.read()?;
        let mut history: Vec<RankingSnapshot> = state
            .snapshots
            .iter()
            .filter(|((s, _), _)| *s == season)
            .flat_map(|(_, rows)| rows.iter().filter(|r| &r.team_id == team_id).cloned())
            .collect();
        history.sort_by_key(|r| r.week);
        Ok(history)
    }
}

impl PredictionStore for MemoryStore {
    fn get_prediction(&self, game_id: &GameId) -> crate::error::Result<Option<Prediction>> {
        Ok(self.read()?.predictions.get(game_id).cloned())
    }

    fn upsert_prediction(&self, prediction: Prediction) -> crate::error::Result<()> {
        self.write()?
            .predictions
            .insert(prediction.game_id, prediction);
        Ok(())
    }

    fn all_predictions(&self) -> crate::error::Result<Vec<Prediction>> {
        Ok(self.read()?.predictions.values().cloned().collect())
    }
}

impl PollStore for MemoryStore {
    fn ap_rank(
        &self,
        team_id: &TeamId,
        season: Season,
        week: Week,
    ) -> crate::error::Result<Option<u16>> {
        Ok(self
            .read()?
            .poll
            .get(&(team_id.clone(), season, week))
            .copied())
    }

    fn upsert_ap_rank(&self, entry: ApPollEntry) -> crate::error::Result<()> {
        self.write()?
            .poll
            .insert((entry.team_id, entry.season, entry.week), entry.rank);
        Ok(())
    }
}
