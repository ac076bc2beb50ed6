//! Database schema definitions for RustRun.

/// SQL schema for creating all database tables.
pub const SCHEMA: &str = r#"
-- Completed sessions
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    owner_id TEXT NOT NULL,
    team TEXT NOT NULL,
    elapsed_seconds INTEGER NOT NULL,
    distance_meters REAL NOT NULL,
    finished_at TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sessions_owner_id ON sessions(owner_id);
CREATE INDEX IF NOT EXISTS idx_sessions_finished_at ON sessions(finished_at);

-- Idempotency ledger: record ids whose aggregation effects are applied
CREATE TABLE IF NOT EXISTS applied_records (
    record_id TEXT PRIMARY KEY,
    applied_at TEXT NOT NULL
);

-- Accumulated team distance per ranking period
CREATE TABLE IF NOT EXISTS team_ranking (
    team TEXT NOT NULL,
    period TEXT NOT NULL,
    distance_meters REAL NOT NULL DEFAULT 0,
    PRIMARY KEY (team, period)
);

-- Lifetime and current-period totals per runner
CREATE TABLE IF NOT EXISTS profile_stats (
    owner_id TEXT PRIMARY KEY,
    total_distance_meters REAL NOT NULL DEFAULT 0,
    total_sessions INTEGER NOT NULL DEFAULT 0,
    current_period_distance_meters REAL NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
);
"#;

/// SQL for the schema version tracking table.
pub const SCHEMA_VERSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);
"#;

/// Current schema version.
pub const CURRENT_VERSION: i32 = 1;
