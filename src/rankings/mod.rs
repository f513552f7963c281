//! Rankings: strength of schedule and weekly snapshots
//!
//! This module computes opponent-strength averages and persists the weekly
//! historical ranking table used for display.

pub mod snapshot;
pub mod sos;

// Re-export commonly used types
pub use snapshot::RankingSnapshotService;
pub use sos::StrengthOfScheduleCalculator;
