//! Core types for community features.
//!
//! Defines team colors, ranking periods, profile statistics, and avatar
//! configuration.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four fixed teams a runner can represent.
///
/// Declaration order is the deterministic tie-break order for rankings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    #[default]
    Blue,
    Red,
    Yellow,
    Green,
}

impl TeamColor {
    /// All teams in tie-break order.
    pub const ALL: [TeamColor; 4] = [
        TeamColor::Blue,
        TeamColor::Red,
        TeamColor::Yellow,
        TeamColor::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamColor::Blue => "blue",
            TeamColor::Red => "red",
            TeamColor::Yellow => "yellow",
            TeamColor::Green => "green",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "blue" => Some(TeamColor::Blue),
            "red" => Some(TeamColor::Red),
            "yellow" => Some(TeamColor::Yellow),
            "green" => Some(TeamColor::Green),
            _ => None,
        }
    }
}

impl std::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed, non-overlapping ranking window: one ISO week.
///
/// A session's distance is attributed to the period containing its
/// `finished_at`, never split across periods. Past periods are immutable
/// once closed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RankingPeriod {
    /// ISO week-numbering year
    pub year: i32,
    /// ISO week number (1-53)
    pub week: u32,
}

impl RankingPeriod {
    /// The period containing the given instant.
    pub fn containing(at: DateTime<Utc>) -> Self {
        let iso = at.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Parse a `YYYY-Wnn` period label.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, week) = s.split_once("-W")?;
        Some(Self {
            year: year.parse().ok()?,
            week: week.parse().ok()?,
        })
    }
}

impl std::fmt::Display for RankingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

/// Accumulated distance for a team within one ranking period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRankingEntry {
    pub team: TeamColor,
    pub period: RankingPeriod,
    pub accumulated_distance_meters: f64,
}

/// A runner's lifetime and current-period totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStatistics {
    pub owner_id: Uuid,
    pub total_distance_meters: f64,
    pub total_sessions: u32,
    pub current_period_distance_meters: f64,
}

impl ProfileStatistics {
    /// Fresh statistics for an owner, all totals at zero.
    pub fn new(owner_id: Uuid) -> Self {
        Self {
            owner_id,
            total_distance_meters: 0.0,
            total_sessions: 0,
            current_period_distance_meters: 0.0,
        }
    }
}

/// Avatar gender selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

/// Avatar customization choices, indices into the app's option lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvatarConfig {
    pub gender: Gender,
    pub hair: u8,
    pub outfit: u8,
    pub accessory: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_team_color_round_trip() {
        for team in TeamColor::ALL {
            assert_eq!(TeamColor::from_str(team.as_str()), Some(team));
        }
        assert_eq!(TeamColor::from_str("purple"), None);
    }

    #[test]
    fn test_period_from_timestamp() {
        let ts = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let period = RankingPeriod::containing(ts);
        assert_eq!(period.year, 2026);
        assert_eq!(period.week, 32);
    }

    #[test]
    fn test_period_label_round_trip() {
        let period = RankingPeriod { year: 2026, week: 5 };
        assert_eq!(period.to_string(), "2026-W05");
        assert_eq!(RankingPeriod::parse("2026-W05"), Some(period));
        assert_eq!(RankingPeriod::parse("garbage"), None);
    }
}
