//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum RatingEngineError {
    #[error("Team not found: {team_id}")]
    TeamNotFound { team_id: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: String },

    #[error("Game is excluded from rankings and must not be processed: {game_id}")]
    ExcludedGame { game_id: String },

    #[error("Game has not been processed yet: {game_id}")]
    GameNotProcessed { game_id: String },

    #[error("Invalid game data: {reason}")]
    InvalidGameData { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}
