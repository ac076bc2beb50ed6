//! Activity tracking service.
//!
//! Wires the session engine to the shared aggregates: on completion the
//! finalized record flows into the team ranking, the owner's statistics,
//! and durable storage, exactly once per record id.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::engine::sampler::LocationSampler;
use crate::engine::session::SessionEngine;
use crate::engine::types::{
    SessionError, SessionOutcome, SessionRecord, SessionSnapshot, SessionState,
};
use crate::social::badges::{best_pace, evaluate_badges, Badge};
use crate::social::profile::ProfileStatsStore;
use crate::social::ranking::TeamRankingAggregator;
use crate::social::types::{ProfileStatistics, RankingPeriod, TeamColor, TeamRankingEntry};
use crate::storage::config::UserProfile;
use crate::storage::database::{Database, DatabaseError};

/// Coordinates one user's sessions and the shared aggregates they feed.
pub struct ActivityTracker {
    engine: SessionEngine,
    ranking: TeamRankingAggregator,
    profile_stats: ProfileStatsStore,
    database: Option<Arc<Database>>,
    /// (elapsed_seconds, distance_meters) of completed sessions, for
    /// pace-based achievements
    completed_totals: Vec<(u32, f64)>,
    owner_id: Uuid,
    team: TeamColor,
}

impl ActivityTracker {
    /// Create a tracker with no persistence (aggregates in memory only).
    pub fn new(profile: &UserProfile, sampler: Box<dyn LocationSampler + Send>) -> Self {
        Self {
            engine: SessionEngine::new(sampler),
            ranking: TeamRankingAggregator::new(),
            profile_stats: ProfileStatsStore::new(),
            database: None,
            completed_totals: Vec::new(),
            owner_id: profile.id,
            team: profile.team,
        }
    }

    /// Create a tracker backed by a database.
    ///
    /// Seeds the in-memory aggregates and idempotency ledgers from the
    /// persisted state so a restart cannot double-apply a session.
    pub fn with_database(
        profile: &UserProfile,
        sampler: Box<dyn LocationSampler + Send>,
        database: Arc<Database>,
    ) -> Result<Self, TrackerError> {
        let mut tracker = Self::new(profile, sampler);

        let applied = database.load_applied_ids()?;
        tracker.ranking.load_applied(applied.iter().copied());
        tracker.profile_stats.load_applied(applied);

        for entry in database.load_team_ranking()? {
            tracker.ranking.load_entry(entry);
        }
        if let Some(stats) = database.load_profile_stats(profile.id)? {
            tracker.profile_stats.load_snapshot(stats);
        }
        for record in database.list_sessions(profile.id)? {
            tracker
                .completed_totals
                .push((record.elapsed_seconds, record.distance_meters));
        }

        tracker.database = Some(database);
        Ok(tracker)
    }

    /// Start a session for the profile's owner, snapshotting their team.
    pub fn start(&mut self) -> Result<Uuid, TrackerError> {
        Ok(self.engine.start(self.owner_id, self.team)?)
    }

    /// Pause the running session.
    pub fn pause(&mut self) -> Result<(), TrackerError> {
        Ok(self.engine.pause()?)
    }

    /// Resume the paused session.
    pub fn resume(&mut self) -> Result<(), TrackerError> {
        Ok(self.engine.resume()?)
    }

    /// Finish the session and apply its record to all aggregates.
    pub fn stop(&mut self) -> Result<SessionOutcome, TrackerError> {
        let outcome = self.engine.stop()?;
        if let SessionOutcome::Completed(record) = &outcome {
            self.finalize(record)?;
        }
        Ok(outcome)
    }

    /// Abandon the session; nothing is aggregated.
    pub fn discard(&mut self) -> Result<SessionOutcome, TrackerError> {
        Ok(self.engine.discard()?)
    }

    /// Deliver one clock tick to the engine.
    pub fn tick(&mut self) {
        self.engine.tick();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.engine.state()
    }

    /// Read-only snapshot of the current session.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.engine.snapshot()
    }

    /// Teams ranked for a period.
    pub fn ranking_for(&self, period: RankingPeriod) -> Vec<TeamRankingEntry> {
        self.ranking.ranking_for(period)
    }

    /// The owner's current statistics.
    pub fn statistics(&self) -> ProfileStatistics {
        self.profile_stats.get(self.owner_id)
    }

    /// Badges evaluated against the owner's statistics.
    pub fn badges(&self) -> Vec<Badge> {
        let stats = self.profile_stats.get(self.owner_id);
        let pace = best_pace(self.completed_totals.iter().copied());
        evaluate_badges(&stats, pace)
    }

    /// Reset the owner's current-period distance (external rollover trigger).
    pub fn roll_over_period(&mut self) -> Result<(), TrackerError> {
        self.profile_stats.roll_over_period(self.owner_id);
        if let Some(db) = &self.database {
            db.upsert_profile_stats(&self.profile_stats.get(self.owner_id))?;
        }
        Ok(())
    }

    /// Apply a completed record to every aggregate, exactly once.
    fn finalize(&mut self, record: &SessionRecord) -> Result<(), TrackerError> {
        let newly_applied = self.ranking.apply(record);
        self.profile_stats.apply(record);

        if newly_applied {
            self.completed_totals
                .push((record.elapsed_seconds, record.distance_meters));
        }

        if let Some(db) = &self.database {
            db.insert_session(record)?;
            db.mark_applied(record.id)?;

            let period = RankingPeriod::containing(record.finished_at);
            if let Some(entry) = self.ranking.entry(record.team, period) {
                db.upsert_team_ranking(&entry)?;
            }
            db.upsert_profile_stats(&self.profile_stats.get(record.owner_id))?;
        }

        Ok(())
    }
}

/// Errors from the activity tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
