//! ELO rating system for college football
//!
//! This module provides the preseason rating model, expected-score math,
//! margin-of-victory weighting, conference-tier multipliers, and the game
//! processor that ties them into a single idempotent state transition.

pub mod conference;
pub mod expected;
pub mod mov;
pub mod preseason;
pub mod processor;

// Re-export commonly used types
pub use conference::ConferenceMultiplier;
pub use expected::ExpectedScoreCalculator;
pub use mov::{MarginOfVictoryEvaluator, MovResult, MovSource};
pub use preseason::PreseasonRatingModel;
pub use processor::{GameProcessor, ProcessOutcome, ProcessedGame};
