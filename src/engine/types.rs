//! Session lifecycle types.
//!
//! Defines the session state machine states, the live `Session` record,
//! the immutable `SessionRecord` snapshot handed to aggregators, and the
//! engine error enum.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::social::types::TeamColor;

/// Lifecycle state of an activity session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session in progress
    #[default]
    Idle,
    /// Accumulating time and distance
    Active,
    /// Accumulation frozen, ticks ignored
    Paused,
    /// Finalized with a record (terminal)
    Completed,
    /// Abandoned without a record (terminal)
    Discarded,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Active => write!(f, "Active"),
            SessionState::Paused => write!(f, "Paused"),
            SessionState::Completed => write!(f, "Completed"),
            SessionState::Discarded => write!(f, "Discarded"),
        }
    }
}

/// A run in progress.
///
/// `elapsed_seconds` and `distance_meters` change only while the session is
/// `Active`. The team is snapshotted at start and never changes for the
/// session's lifetime, so switching teams mid-run cannot rewrite history.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique identifier, assigned at start
    pub id: Uuid,
    /// User who owns the session
    pub owner_id: Uuid,
    /// Team attribution snapshot taken at start
    pub team: TeamColor,
    /// Current lifecycle state
    pub state: SessionState,
    /// Session start timestamp
    pub started_at: DateTime<Utc>,
    /// Seconds spent in the Active state
    pub elapsed_seconds: u32,
    /// Cumulative path length in meters
    pub distance_meters: f64,
}

impl Session {
    /// Create a new active session for an owner.
    pub fn new(owner_id: Uuid, team: TeamColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            team,
            state: SessionState::Active,
            started_at: Utc::now(),
            elapsed_seconds: 0,
            distance_meters: 0.0,
        }
    }
}

/// Immutable summary of a completed session.
///
/// This is the only value aggregators ever see; they hold no reference back
/// to the live session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier (idempotency key for aggregation)
    pub id: Uuid,
    /// User who completed the session
    pub owner_id: Uuid,
    /// Team the distance is attributed to
    pub team: TeamColor,
    /// Active time in seconds
    pub elapsed_seconds: u32,
    /// Total distance in meters
    pub distance_meters: f64,
    /// Completion timestamp (determines the ranking period)
    pub finished_at: DateTime<Utc>,
}

/// Outcome of ending a session.
///
/// A tagged variant rather than a flag so consumers must branch on the
/// discard case.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    /// Session finished normally, record must be aggregated exactly once
    Completed(SessionRecord),
    /// Session abandoned, nothing to aggregate
    Discarded,
}

/// Read-only projection of the current session for observers.
///
/// Derived metrics are recomputed from the authoritative time/distance pair
/// on every read and never stored, so they cannot drift from the source.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Current lifecycle state
    pub state: SessionState,
    /// Active seconds so far
    pub elapsed_seconds: u32,
    /// Distance so far in meters
    pub distance_meters: f64,
    /// Seconds per kilometer, absent until any distance is covered
    pub pace_seconds_per_km: Option<f64>,
    /// Average speed in km/h, absent until any time has elapsed
    pub average_speed_kmh: Option<f64>,
    /// Estimated energy expenditure in kcal
    pub energy_kcal: f64,
}

/// Errors from the session engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// start() while a session is already Active or Paused for the owner
    #[error("A session is already active")]
    SessionAlreadyActive,

    /// A lifecycle command issued in a state that forbids it
    #[error("Cannot {command} while {state}")]
    InvalidTransition {
        command: &'static str,
        state: SessionState,
    },
}
