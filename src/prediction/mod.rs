//! Pregame predictions and accuracy evaluation
//!
//! This module generates win/score predictions for unprocessed games,
//! settles them once games are processed, and aggregates accuracy overall,
//! per team, and against the AP-poll-implied baseline.

pub mod accuracy;
pub mod engine;

// Re-export commonly used types
pub use accuracy::{AccuracyAggregator, AccuracyReport, ApComparison};
pub use engine::{PredictionEngine, PredictionScope};
