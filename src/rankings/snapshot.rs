//! Weekly ranking snapshot service
//!
//! Ranks non-FCS teams by rating (stable, ties broken by team id) and by
//! strength of schedule independently, then persists one immutable row per
//! team for the (season, week) key, replacing any prior rows.

use crate::rankings::sos::StrengthOfScheduleCalculator;
use crate::storage::EngineStore;
use crate::types::{RankingSnapshot, Season, Team, Week};
use crate::utils::current_timestamp;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::info;

/// Weekly ranking snapshot writer
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingSnapshotService {
    sos: StrengthOfScheduleCalculator,
}

impl RankingSnapshotService {
    pub fn new(sos: StrengthOfScheduleCalculator) -> Self {
        Self { sos }
    }

    /// Build and persist the ranking table for (season, week)
    ///
    /// Returns the number of rows written.
    pub fn save_weekly_rankings(
        &self,
        store: &dyn EngineStore,
        season: Season,
        week: Week,
    ) -> crate::error::Result<usize> {
        let ranked_teams: Vec<Team> = store
            .all_teams()?
            .into_iter()
            .filter(|t| t.tier.is_fbs())
            .collect();

        let mut entries: Vec<(Team, f64)> = Vec::with_capacity(ranked_teams.len());
        for team in ranked_teams {
            let sos = self.sos.calculate(store, &team.id, season)?;
            entries.push((team, sos));
        }

        // Rank by rating descending; team id is the fixed secondary key so
        // equal ratings order deterministically.
        let mut by_rating: Vec<usize> = (0..entries.len()).collect();
        by_rating.sort_by(|&a, &b| descending(entries[a].0.rating, entries[b].0.rating, &entries[a].0.id, &entries[b].0.id));

        let mut by_sos: Vec<usize> = (0..entries.len()).collect();
        by_sos.sort_by(|&a, &b| descending(entries[a].1, entries[b].1, &entries[a].0.id, &entries[b].0.id));

        let mut sos_ranks: HashMap<usize, u32> = HashMap::with_capacity(entries.len());
        for (position, &index) in by_sos.iter().enumerate() {
            sos_ranks.insert(index, position as u32 + 1);
        }

        let now = current_timestamp();
        let rows: Vec<RankingSnapshot> = by_rating
            .iter()
            .enumerate()
            .map(|(position, &index)| {
                let (team, sos) = &entries[index];
                RankingSnapshot {
                    team_id: team.id.clone(),
                    season,
                    week,
                    rank: position as u32 + 1,
                    rating: team.rating,
                    wins: team.wins,
                    losses: team.losses,
                    sos: *sos,
                    sos_rank: sos_ranks[&index],
                    created_at: now,
                }
            })
            .collect();

        let count = store.replace_week_snapshots(season, week, rows)?;
        info!(season, week, count, "saved weekly rankings");
        Ok(count)
    }
}

fn descending(a: f64, b: f64, a_id: &str, b_id: &str) -> Ordering {
    b.partial_cmp(&a)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a_id.cmp(b_id))
}
