//! Team ranking aggregation.
//!
//! Accumulates completed-session distance per team per ranking period.
//! `apply()` is the sole mutation path and is idempotent per record id, so
//! a replayed record can never double-count.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::engine::types::SessionRecord;
use crate::social::types::{RankingPeriod, TeamColor, TeamRankingEntry};

/// Aggregates team distances for ranking periods.
///
/// Owned by the completion path; callers needing concurrent completions
/// (e.g. a server-side fleet) must serialize `apply()` per aggregate key
/// externally.
#[derive(Debug, Default)]
pub struct TeamRankingAggregator {
    entries: HashMap<(TeamColor, RankingPeriod), f64>,
    applied: HashSet<Uuid>,
}

impl TeamRankingAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a persisted entry, e.g. when reloading at startup.
    pub fn load_entry(&mut self, entry: TeamRankingEntry) {
        self.entries
            .insert((entry.team, entry.period), entry.accumulated_distance_meters);
    }

    /// Seed the idempotency ledger with already-applied record ids.
    pub fn load_applied(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.applied.extend(ids);
    }

    /// Apply a completed session to its team's period total.
    ///
    /// Returns `false` if the record was already applied; the replay is
    /// absorbed silently since it is an idempotency safeguard, not a user
    /// mistake.
    pub fn apply(&mut self, record: &SessionRecord) -> bool {
        if !self.applied.insert(record.id) {
            tracing::debug!(record_id = %record.id, "Ranking replay ignored");
            return false;
        }

        let period = RankingPeriod::containing(record.finished_at);
        let total = self.entries.entry((record.team, period)).or_insert(0.0);
        *total += record.distance_meters;

        tracing::info!(
            team = %record.team,
            %period,
            distance_meters = record.distance_meters,
            "Ranking updated"
        );
        true
    }

    /// Whether a record id has already been applied.
    pub fn is_applied(&self, record_id: Uuid) -> bool {
        self.applied.contains(&record_id)
    }

    /// Accumulated distance for a team in a period, 0 if absent.
    pub fn accumulated_distance(&self, team: TeamColor, period: RankingPeriod) -> f64 {
        self.entries.get(&(team, period)).copied().unwrap_or(0.0)
    }

    /// The entry a team holds in a period, if it has one.
    pub fn entry(&self, team: TeamColor, period: RankingPeriod) -> Option<TeamRankingEntry> {
        self.entries
            .get(&(team, period))
            .map(|&accumulated_distance_meters| TeamRankingEntry {
                team,
                period,
                accumulated_distance_meters,
            })
    }

    /// Teams ordered by accumulated distance, descending.
    ///
    /// Ties break by team in declaration order for determinism. A period
    /// with no entries yields an empty ranking, never an error.
    pub fn ranking_for(&self, period: RankingPeriod) -> Vec<TeamRankingEntry> {
        let mut ranking: Vec<TeamRankingEntry> = self
            .entries
            .iter()
            .filter(|((_, p), _)| *p == period)
            .map(|(&(team, period), &accumulated_distance_meters)| TeamRankingEntry {
                team,
                period,
                accumulated_distance_meters,
            })
            .collect();

        ranking.sort_by(|a, b| {
            b.accumulated_distance_meters
                .partial_cmp(&a.accumulated_distance_meters)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.team.cmp(&b.team))
        });
        ranking
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(team: TeamColor, distance: f64) -> SessionRecord {
        SessionRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            team,
            elapsed_seconds: 600,
            distance_meters: distance,
            finished_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_accumulates_per_team() {
        let mut aggregator = TeamRankingAggregator::new();
        let period = RankingPeriod::containing(Utc::now());

        assert!(aggregator.apply(&record(TeamColor::Blue, 1000.0)));
        assert!(aggregator.apply(&record(TeamColor::Blue, 1500.0)));
        assert!(aggregator.apply(&record(TeamColor::Red, 500.0)));

        assert_eq!(
            aggregator.accumulated_distance(TeamColor::Blue, period),
            2500.0
        );

        let ranking = aggregator.ranking_for(period);
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].team, TeamColor::Blue);
        assert_eq!(ranking[1].team, TeamColor::Red);
    }

    #[test]
    fn test_replay_is_a_no_op() {
        let mut aggregator = TeamRankingAggregator::new();
        let period = RankingPeriod::containing(Utc::now());
        let rec = record(TeamColor::Green, 2000.0);

        assert!(aggregator.apply(&rec));
        assert!(!aggregator.apply(&rec));

        assert_eq!(
            aggregator.accumulated_distance(TeamColor::Green, period),
            2000.0
        );
    }

    #[test]
    fn test_ties_break_by_team_order() {
        let mut aggregator = TeamRankingAggregator::new();
        let period = RankingPeriod::containing(Utc::now());

        aggregator.apply(&record(TeamColor::Green, 1000.0));
        aggregator.apply(&record(TeamColor::Blue, 1000.0));

        let ranking = aggregator.ranking_for(period);
        assert_eq!(ranking[0].team, TeamColor::Blue);
        assert_eq!(ranking[1].team, TeamColor::Green);
    }

    #[test]
    fn test_unknown_period_yields_empty_ranking() {
        let aggregator = TeamRankingAggregator::new();
        let ranking = aggregator.ranking_for(RankingPeriod { year: 1999, week: 1 });
        assert!(ranking.is_empty());
    }
}
