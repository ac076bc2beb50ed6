//! Session engine state machine.
//!
//! Owns the lifecycle of one activity session: Idle → Active ⇄ Paused →
//! Completed/Discarded. The engine never starts its own timer; an external
//! scheduler delivers ticks via [`SessionEngine::tick`], which is the only
//! point where time and distance accumulate.

use uuid::Uuid;

use crate::engine::sampler::LocationSampler;
use crate::engine::types::{
    Session, SessionError, SessionOutcome, SessionRecord, SessionSnapshot, SessionState,
};
use crate::metrics::calculator::SessionMetrics;
use crate::social::types::TeamColor;

/// Default tick interval in seconds.
const DEFAULT_TICK_INTERVAL_SECONDS: u32 = 1;

/// State machine for one activity session.
///
/// Only one session can be Active or Paused per engine; the engine returns
/// to Idle once a session reaches a terminal state, and the terminal result
/// travels in the returned [`SessionOutcome`].
pub struct SessionEngine {
    /// Position source queried once per Active tick
    sampler: Box<dyn LocationSampler + Send>,
    /// Seconds credited per tick
    tick_interval_seconds: u32,
    /// Current session, if any
    session: Option<Session>,
}

impl SessionEngine {
    /// Create an engine reading from the given sampler at a 1 s tick.
    pub fn new(sampler: Box<dyn LocationSampler + Send>) -> Self {
        Self::with_tick_interval(sampler, DEFAULT_TICK_INTERVAL_SECONDS)
    }

    /// Create an engine with a custom tick interval.
    pub fn with_tick_interval(
        sampler: Box<dyn LocationSampler + Send>,
        tick_interval_seconds: u32,
    ) -> Self {
        Self {
            sampler,
            tick_interval_seconds,
            session: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or(SessionState::Idle)
    }

    /// The session in progress, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Start a new session for the owner, snapshotting team attribution.
    ///
    /// Fails with [`SessionError::SessionAlreadyActive`] if a session is
    /// already Active or Paused; the running session is untouched.
    pub fn start(&mut self, owner_id: Uuid, team: TeamColor) -> Result<Uuid, SessionError> {
        if self.session.is_some() {
            return Err(SessionError::SessionAlreadyActive);
        }

        let session = Session::new(owner_id, team);
        let id = session.id;
        self.session = Some(session);

        tracing::info!(session_id = %id, %team, "Session started");
        Ok(id)
    }

    /// Freeze accumulation. Ticks while paused are ignored.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        let session = self.require_state("pause", SessionState::Active)?;
        session.state = SessionState::Paused;
        tracing::info!(session_id = %session.id, "Session paused");
        Ok(())
    }

    /// Resume accumulation from the frozen values.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let session = self.require_state("resume", SessionState::Paused)?;
        session.state = SessionState::Active;
        tracing::info!(session_id = %session.id, "Session resumed");
        Ok(())
    }

    /// Finish the session, producing exactly one [`SessionRecord`].
    ///
    /// Permitted from Active or Paused. The engine returns to Idle and will
    /// not attribute further ticks to the finished session.
    pub fn stop(&mut self) -> Result<SessionOutcome, SessionError> {
        let mut session = self.take_open("stop")?;
        session.state = SessionState::Completed;

        let record = SessionRecord {
            id: session.id,
            owner_id: session.owner_id,
            team: session.team,
            elapsed_seconds: session.elapsed_seconds,
            distance_meters: session.distance_meters,
            finished_at: chrono::Utc::now(),
        };

        tracing::info!(
            session_id = %record.id,
            elapsed_seconds = record.elapsed_seconds,
            distance_meters = record.distance_meters,
            "Session completed"
        );
        Ok(SessionOutcome::Completed(record))
    }

    /// Abandon the session. No record is produced.
    pub fn discard(&mut self) -> Result<SessionOutcome, SessionError> {
        let mut session = self.take_open("discard")?;
        session.state = SessionState::Discarded;
        tracing::info!(session_id = %session.id, "Session discarded");
        Ok(SessionOutcome::Discarded)
    }

    /// Process one clock tick.
    ///
    /// Only meaningful while Active: credits the tick interval to elapsed
    /// time and pulls a distance delta from the sampler. A failing sampler
    /// degrades to a 0-delta tick so the timer keeps advancing; a negative
    /// delta is treated as 0 so recorded distance never decreases.
    pub fn tick(&mut self) {
        let session = match self.session.as_mut() {
            Some(s) if s.state == SessionState::Active => s,
            _ => return,
        };

        session.elapsed_seconds += self.tick_interval_seconds;

        let delta = match self.sampler.sample_delta_meters() {
            Ok(d) if d >= 0.0 => d,
            Ok(d) => {
                tracing::warn!(session_id = %session.id, "Ignoring negative sampler delta: {d}");
                0.0
            }
            Err(e) => {
                tracing::warn!(session_id = %session.id, "Sampler unavailable, 0-delta tick: {e}");
                0.0
            }
        };
        session.distance_meters += delta;
    }

    /// Read-only snapshot with derived metrics for observers.
    pub fn snapshot(&self) -> SessionSnapshot {
        match self.session.as_ref() {
            Some(s) => {
                let metrics = SessionMetrics::from_totals(s.elapsed_seconds, s.distance_meters);
                SessionSnapshot {
                    state: s.state,
                    elapsed_seconds: s.elapsed_seconds,
                    distance_meters: s.distance_meters,
                    pace_seconds_per_km: metrics.pace_seconds_per_km,
                    average_speed_kmh: metrics.average_speed_kmh,
                    energy_kcal: metrics.energy_kcal,
                }
            }
            None => SessionSnapshot::default(),
        }
    }

    fn require_state(
        &mut self,
        command: &'static str,
        expected: SessionState,
    ) -> Result<&mut Session, SessionError> {
        let state = self.state();
        match self.session.as_mut() {
            Some(s) if s.state == expected => Ok(s),
            _ => Err(SessionError::InvalidTransition { command, state }),
        }
    }

    /// Take the session out of the engine if it is Active or Paused.
    fn take_open(&mut self, command: &'static str) -> Result<Session, SessionError> {
        // A stored session is always Active or Paused; terminal states
        // clear the slot.
        match self.session.take() {
            Some(session) => Ok(session),
            None => Err(SessionError::InvalidTransition {
                command,
                state: SessionState::Idle,
            }),
        }
    }
}
