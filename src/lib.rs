//! Gridiron Ratings - College football ELO rating engine
//!
//! This crate maintains ELO-style team ratings across a college football
//! season: preseason initialization from roster signals, per-game rating
//! updates with margin-of-victory and conference-tier adjustments, weekly
//! ranking snapshots, and pregame predictions with accuracy tracking.

pub mod config;
pub mod engine;
pub mod error;
pub mod prediction;
pub mod rankings;
pub mod rating;
pub mod storage;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingEngineError, Result};
pub use types::*;

// Re-export key components
pub use engine::{EngineStats, RatingEngine, ReplaySummary};
pub use prediction::engine::PredictionScope;
pub use rating::processor::ProcessOutcome;
pub use storage::{EngineStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
