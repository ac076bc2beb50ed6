//! Database operations using rusqlite.
//!
//! Persists completed sessions, aggregation snapshots, and the applied-record
//! ledger so a restart cannot double-apply a session.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

use crate::engine::types::SessionRecord;
use crate::social::types::{ProfileStatistics, RankingPeriod, TeamColor, TeamRankingEntry};
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};

/// Database wrapper for SQLite operations.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create a database at the given path.
    pub fn open(path: &PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::IoError(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

        let db = Self { conn };
        db.initialize()?;

        Ok(db)
    }

    /// Initialize the database schema.
    fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

        let current_version = self.get_schema_version()?;

        if current_version < CURRENT_VERSION {
            self.migrate(current_version)?;
        }

        Ok(())
    }

    /// Get the current schema version.
    fn get_schema_version(&self) -> Result<i32, DatabaseError> {
        let result: SqliteResult<i32> = self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }

    /// Run database migrations.
    fn migrate(&self, from_version: i32) -> Result<(), DatabaseError> {
        if from_version < 1 {
            self.conn
                .execute_batch(SCHEMA)
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            self.conn
                .execute(
                    "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                    [CURRENT_VERSION],
                )
                .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

            tracing::info!("Database migrated to version {}", CURRENT_VERSION);
        }

        // Future migrations would go here:
        // if from_version < 2 { ... }

        Ok(())
    }

    /// Get a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // ========== Session records ==========

    /// Insert a completed session record. Replays are ignored by id.
    pub fn insert_session(&self, record: &SessionRecord) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT OR IGNORE INTO sessions
                 (id, owner_id, team, elapsed_seconds, distance_meters, finished_at, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.id.to_string(),
                    record.owner_id.to_string(),
                    record.team.as_str(),
                    record.elapsed_seconds,
                    record.distance_meters,
                    record.finished_at.to_rfc3339(),
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// List an owner's completed sessions, most recent first.
    pub fn list_sessions(&self, owner_id: Uuid) -> Result<Vec<SessionRecord>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, owner_id, team, elapsed_seconds, distance_meters, finished_at
                 FROM sessions WHERE owner_id = ?1
                 ORDER BY finished_at DESC",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([owner_id.to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, u32>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id_str, owner_str, team_str, elapsed_seconds, distance_meters, finished_str) =
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            records.push(SessionRecord {
                id: Uuid::parse_str(&id_str)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
                owner_id: Uuid::parse_str(&owner_str)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
                team: TeamColor::from_str(&team_str).ok_or_else(|| {
                    DatabaseError::SerializationError(format!("unknown team: {team_str}"))
                })?,
                elapsed_seconds,
                distance_meters,
                finished_at: DateTime::parse_from_rfc3339(&finished_str)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?
                    .with_timezone(&Utc),
            });
        }

        Ok(records)
    }

    // ========== Idempotency ledger ==========

    /// Record that a session's aggregation effects were applied.
    ///
    /// Returns `false` if the id was already in the ledger.
    pub fn mark_applied(&self, record_id: Uuid) -> Result<bool, DatabaseError> {
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO applied_records (record_id, applied_at) VALUES (?1, ?2)",
                params![record_id.to_string(), Utc::now().to_rfc3339()],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(inserted > 0)
    }

    /// Load all applied record ids, to seed the in-memory ledgers at startup.
    pub fn load_applied_ids(&self) -> Result<Vec<Uuid>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT record_id FROM applied_records")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut ids = Vec::new();
        for row in rows {
            let id_str = row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
            ids.push(
                Uuid::parse_str(&id_str)
                    .map_err(|e| DatabaseError::SerializationError(e.to_string()))?,
            );
        }

        Ok(ids)
    }

    // ========== Aggregation snapshots ==========

    /// Upsert a team's accumulated distance for a period.
    pub fn upsert_team_ranking(&self, entry: &TeamRankingEntry) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO team_ranking (team, period, distance_meters)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(team, period) DO UPDATE SET distance_meters = excluded.distance_meters",
                params![
                    entry.team.as_str(),
                    entry.period.to_string(),
                    entry.accumulated_distance_meters,
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Load every persisted team ranking entry.
    pub fn load_team_ranking(&self) -> Result<Vec<TeamRankingEntry>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT team, period, distance_meters FROM team_ranking")
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (team_str, period_str, distance_meters) =
                row.map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

            entries.push(TeamRankingEntry {
                team: TeamColor::from_str(&team_str).ok_or_else(|| {
                    DatabaseError::SerializationError(format!("unknown team: {team_str}"))
                })?,
                period: RankingPeriod::parse(&period_str).ok_or_else(|| {
                    DatabaseError::SerializationError(format!("bad period: {period_str}"))
                })?,
                accumulated_distance_meters: distance_meters,
            });
        }

        Ok(entries)
    }

    /// Upsert a runner's statistics snapshot.
    pub fn upsert_profile_stats(&self, stats: &ProfileStatistics) -> Result<(), DatabaseError> {
        self.conn
            .execute(
                "INSERT INTO profile_stats
                 (owner_id, total_distance_meters, total_sessions, current_period_distance_meters, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(owner_id) DO UPDATE SET
                     total_distance_meters = excluded.total_distance_meters,
                     total_sessions = excluded.total_sessions,
                     current_period_distance_meters = excluded.current_period_distance_meters,
                     updated_at = excluded.updated_at",
                params![
                    stats.owner_id.to_string(),
                    stats.total_distance_meters,
                    stats.total_sessions,
                    stats.current_period_distance_meters,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    /// Load a runner's statistics snapshot, if persisted.
    pub fn load_profile_stats(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<ProfileStatistics>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT total_distance_meters, total_sessions, current_period_distance_meters
                 FROM profile_stats WHERE owner_id = ?1",
            )
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;

        let result = stmt.query_row([owner_id.to_string()], |row| {
            Ok(ProfileStatistics {
                owner_id,
                total_distance_meters: row.get(0)?,
                total_sessions: row.get(1)?,
                current_period_distance_meters: row.get(2)?,
            })
        });

        match result {
            Ok(stats) => Ok(Some(stats)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryFailed(e.to_string())),
        }
    }
}

/// Database errors.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}
