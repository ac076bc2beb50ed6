//! Profile statistics store.
//!
//! Lifetime totals and current-period distance per runner, updated exactly
//! once per completed session through the same idempotency contract as the
//! team ranking.

use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::engine::types::SessionRecord;
use crate::social::types::ProfileStatistics;

/// Holds each runner's accumulated statistics.
///
/// `apply()` is the sole mutation path; readers observe either the pre-apply
/// or the fully post-apply state, never a partial update.
#[derive(Debug, Default)]
pub struct ProfileStatsStore {
    stats: HashMap<Uuid, ProfileStatistics>,
    applied: HashSet<Uuid>,
}

impl ProfileStatsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a persisted snapshot, e.g. when reloading at startup.
    pub fn load_snapshot(&mut self, stats: ProfileStatistics) {
        self.stats.insert(stats.owner_id, stats);
    }

    /// Seed the idempotency ledger with already-applied record ids.
    pub fn load_applied(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.applied.extend(ids);
    }

    /// Apply a completed session to the owner's totals.
    ///
    /// Increments `total_sessions` by exactly one and both distance totals
    /// by exactly the record's distance. Returns `false` on replay, which is
    /// silently absorbed.
    pub fn apply(&mut self, record: &SessionRecord) -> bool {
        if !self.applied.insert(record.id) {
            tracing::debug!(record_id = %record.id, "Profile stats replay ignored");
            return false;
        }

        let stats = self
            .stats
            .entry(record.owner_id)
            .or_insert_with(|| ProfileStatistics::new(record.owner_id));

        stats.total_distance_meters += record.distance_meters;
        stats.total_sessions += 1;
        stats.current_period_distance_meters += record.distance_meters;

        tracing::info!(
            owner_id = %record.owner_id,
            total_sessions = stats.total_sessions,
            total_distance_meters = stats.total_distance_meters,
            "Profile stats updated"
        );
        true
    }

    /// Whether a record id has already been applied.
    pub fn is_applied(&self, record_id: Uuid) -> bool {
        self.applied.contains(&record_id)
    }

    /// Current snapshot for an owner; zeroed totals if nothing applied yet.
    pub fn get(&self, owner_id: Uuid) -> ProfileStatistics {
        self.stats
            .get(&owner_id)
            .cloned()
            .unwrap_or_else(|| ProfileStatistics::new(owner_id))
    }

    /// Reset the owner's current-period distance.
    ///
    /// Rollover is an explicit external trigger, not inferred from session
    /// timestamps, so an already-reported period is never retroactively
    /// corrupted.
    pub fn roll_over_period(&mut self, owner_id: Uuid) {
        if let Some(stats) = self.stats.get_mut(&owner_id) {
            stats.current_period_distance_meters = 0.0;
            tracing::info!(owner_id = %owner_id, "Period distance rolled over");
        }
    }
}
