//! Shared test fixtures for integration tests
//!
//! Builders for teams and games plus a small helper that stands up a
//! complete engine over a fresh in-memory store.

use gridiron_ratings::config::RatingConfig;
use gridiron_ratings::engine::RatingEngine;
use gridiron_ratings::storage::{GameStore, MemoryStore, TeamStore};
use gridiron_ratings::types::{
    ConferenceTier, Game, GameClassification, GameId, QuarterScores, Season, Team, Week,
};
use gridiron_ratings::utils::generate_game_id;
use std::sync::Arc;

pub const TEST_SEASON: Season = 2025;

/// Team builder with sensible defaults
pub struct TeamBuilder {
    team: Team,
}

impl TeamBuilder {
    pub fn new(id: &str, tier: ConferenceTier) -> Self {
        Self {
            team: Team::new(id.to_string(), id.to_string(), tier),
        }
    }

    pub fn recruiting_rank(mut self, rank: u16) -> Self {
        self.team.recruiting_rank = Some(rank);
        self
    }

    pub fn transfer_rank(mut self, rank: u16) -> Self {
        self.team.transfer_rank = Some(rank);
        self
    }

    pub fn returning_production(mut self, value: f64) -> Self {
        self.team.returning_production = value;
        self
    }

    pub fn build(self) -> Team {
        self.team
    }
}

/// Game builder with sensible defaults
pub struct GameBuilder {
    game: Game,
}

impl GameBuilder {
    pub fn new(home: &str, away: &str, week: Week) -> Self {
        Self {
            game: Game {
                id: generate_game_id(),
                season: TEST_SEASON,
                week,
                home_team: home.to_string(),
                away_team: away.to_string(),
                home_score: 0,
                away_score: 0,
                quarter_scores: None,
                neutral_site: false,
                classification: GameClassification::Regular,
                is_processed: false,
                excluded_from_rankings: false,
                home_rating_change: None,
                away_rating_change: None,
            },
        }
    }

    pub fn score(mut self, home: u16, away: u16) -> Self {
        self.game.home_score = home;
        self.game.away_score = away;
        self
    }

    pub fn quarters(mut self, home: [u16; 4], away: [u16; 4]) -> Self {
        self.game.quarter_scores = Some(QuarterScores { home, away });
        self
    }

    pub fn neutral(mut self) -> Self {
        self.game.neutral_site = true;
        self
    }

    pub fn excluded(mut self) -> Self {
        self.game.excluded_from_rankings = true;
        self
    }

    pub fn build(self) -> Game {
        self.game
    }
}

/// Create an engine over a fresh store with default configuration
pub fn create_test_engine() -> (RatingEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = RatingEngine::new(store.clone(), RatingConfig::default())
        .expect("default config is valid");
    (engine, store)
}

/// Seed a team and initialize its preseason rating
pub fn seed_team(engine: &RatingEngine, store: &MemoryStore, team: Team) -> f64 {
    let id = team.id.clone();
    store.upsert_team(team).expect("upsert team");
    engine
        .initialize_preseason_rating(&id)
        .expect("preseason init")
}

/// Seed a game and return its id
pub fn seed_game(store: &MemoryStore, game: Game) -> GameId {
    let id = game.id;
    store.upsert_game(game).expect("upsert game");
    id
}
