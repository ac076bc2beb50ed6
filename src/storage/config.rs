//! User profile and application configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::social::types::{AvatarConfig, TeamColor};

/// User profile with identity, team membership, and avatar choices.
///
/// The session engine snapshots `team` at session start; editing the
/// profile mid-run never rewrites historical attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Short bio shown on the profile
    pub bio: Option<String>,
    /// Team membership
    pub team: TeamColor,
    /// Avatar customization
    pub avatar: AvatarConfig,
    /// Profile creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for UserProfile {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: "Runner".to_string(),
            bio: None,
            team: TeamColor::Blue,
            avatar: AvatarConfig::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl UserProfile {
    /// Create a new user profile with the given name and team.
    pub fn new(name: String, team: TeamColor) -> Self {
        Self {
            name,
            team,
            ..Default::default()
        }
    }

    /// Switch teams. Takes effect for sessions started afterwards.
    pub fn set_team(&mut self, team: TeamColor) {
        self.team = team;
        self.updated_at = Utc::now();
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// The local user's profile
    pub profile: UserProfile,
    /// Tracking settings
    pub tracking: TrackingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            profile: UserProfile::default(),
            tracking: TrackingSettings::default(),
        }
    }
}

/// Tracking-related settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingSettings {
    /// Clock tick interval in seconds
    pub tick_interval_secs: u32,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "rustrun", "RustRun")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from file.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = get_config_path();

    if !path.exists() {
        let config = AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        };
        return Ok(config);
    }

    let content =
        std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.data_dir = get_data_dir();

    Ok(config)
}

/// Save application configuration to file.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = get_config_path();

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_team_switch_updates_timestamp() {
        let mut profile = UserProfile::new("Carlos".to_string(), TeamColor::Blue);
        let before = profile.updated_at;

        profile.set_team(TeamColor::Red);
        assert_eq!(profile.team, TeamColor::Red);
        assert!(profile.updated_at >= before);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.profile.id, config.profile.id);
        assert_eq!(parsed.profile.team, config.profile.team);
        assert_eq!(parsed.tracking.tick_interval_secs, 1);
    }
}
