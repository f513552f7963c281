//! Common types used throughout the rating engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for teams (short slug, e.g. "georgia")
pub type TeamId = String;

/// Unique identifier for games
pub type GameId = Uuid;

/// Season year, e.g. 2025
pub type Season = u16;

/// Week number within a season
pub type Week = u8;

/// Conference tier of a team
///
/// Closed enum so every tier decision in the engine is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConferenceTier {
    PowerFive,
    GroupOfFive,
    Fcs,
}

impl std::fmt::Display for ConferenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConferenceTier::PowerFive => write!(f, "P5"),
            ConferenceTier::GroupOfFive => write!(f, "G5"),
            ConferenceTier::Fcs => write!(f, "FCS"),
        }
    }
}

impl ConferenceTier {
    /// Whether this tier is part of the FBS division
    pub fn is_fbs(&self) -> bool {
        match self {
            ConferenceTier::PowerFive | ConferenceTier::GroupOfFive => true,
            ConferenceTier::Fcs => false,
        }
    }
}

/// Classification of a game within the season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameClassification {
    Regular,
    ConferenceChampionship,
    Bowl,
    Playoff,
}

/// A team and its current rating state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub tier: ConferenceTier,
    /// National recruiting class rank, None if unranked
    pub recruiting_rank: Option<u16>,
    /// Transfer portal class rank, None if unranked
    pub transfer_rank: Option<u16>,
    /// Fraction of production returning from last season, in [0, 1]
    pub returning_production: f64,
    /// Current rating, mutated only by game processing and season reset
    pub rating: f64,
    /// Preseason rating, written once at initialization
    pub initial_rating: f64,
    pub wins: u32,
    pub losses: u32,
}

impl Team {
    /// Create a team with no rating yet (rating 0.0 means uninitialized)
    pub fn new(id: TeamId, name: String, tier: ConferenceTier) -> Self {
        Self {
            id,
            name,
            tier,
            recruiting_rank: None,
            transfer_rank: None,
            returning_production: 0.0,
            rating: 0.0,
            initial_rating: 0.0,
            wins: 0,
            losses: 0,
        }
    }

    /// Whether the team carries a usable rating
    ///
    /// Placeholder teams are stored with rating 0.0 and are excluded from
    /// prediction generation until initialized.
    pub fn is_rated(&self) -> bool {
        self.rating > 0.0
    }
}

/// Per-quarter scoring for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScores {
    pub home: [u16; 4],
    pub away: [u16; 4],
}

impl QuarterScores {
    /// Check that the quarter scores sum to the final score
    pub fn matches_final(&self, home_score: u16, away_score: u16) -> bool {
        let home_sum: u16 = self.home.iter().sum();
        let away_sum: u16 = self.away.iter().sum();
        home_sum == home_score && away_sum == away_score
    }
}

/// A completed game between two teams
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub season: Season,
    pub week: Week,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_score: u16,
    pub away_score: u16,
    pub quarter_scores: Option<QuarterScores>,
    pub neutral_site: bool,
    pub classification: GameClassification,
    /// Set once by the game processor; never cleared outside a season reset
    pub is_processed: bool,
    /// Excluded games are never processed and never count toward SOS
    pub excluded_from_rankings: bool,
    pub home_rating_change: Option<f64>,
    pub away_rating_change: Option<f64>,
}

impl Game {
    /// Whether the home side won (ties are not modeled)
    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    /// Id of the team that won the game
    pub fn winner_id(&self) -> &TeamId {
        if self.home_won() {
            &self.home_team
        } else {
            &self.away_team
        }
    }

    /// Id of the opponent of `team_id`, if the team played in this game
    pub fn opponent_of(&self, team_id: &TeamId) -> Option<&TeamId> {
        if &self.home_team == team_id {
            Some(&self.away_team)
        } else if &self.away_team == team_id {
            Some(&self.home_team)
        } else {
            None
        }
    }
}

/// Weekly ranking snapshot for a single team
///
/// Immutable historical fact keyed by (team, season, week). Re-snapshotting
/// a week replaces all prior rows for that week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub team_id: TeamId,
    pub season: Season,
    pub week: Week,
    pub rank: u32,
    pub rating: f64,
    pub wins: u32,
    pub losses: u32,
    pub sos: f64,
    pub sos_rank: u32,
    pub created_at: DateTime<Utc>,
}

/// Confidence tier of a prediction, derived from the win probability gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfidenceTier::High => write!(f, "High"),
            ConfidenceTier::Medium => write!(f, "Medium"),
            ConfidenceTier::Low => write!(f, "Low"),
        }
    }
}

/// Pregame prediction for a single game, unique per game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub game_id: GameId,
    pub predicted_winner: TeamId,
    pub predicted_home_score: u16,
    pub predicted_away_score: u16,
    /// Rounded win probability percentages, summing to 100
    pub home_win_probability: u8,
    pub away_win_probability: u8,
    pub confidence: ConfidenceTier,
    /// Ratings at the time the prediction was generated
    pub home_rating_used: f64,
    pub away_rating_used: f64,
    /// Null until the game is processed, then set exactly once
    pub was_correct: Option<bool>,
    pub created_at: DateTime<Utc>,
}

/// Prediction joined with matchup context for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionView {
    pub game_id: GameId,
    pub season: Season,
    pub week: Week,
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub prediction: Prediction,
}

/// AP poll rank fact, used only by the accuracy baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApPollEntry {
    pub team_id: TeamId,
    pub season: Season,
    pub week: Week,
    pub rank: u16,
}
