//! Badge and achievement definitions.
//!
//! Badges are evaluated against profile statistics; criteria checking is
//! pure, persistence of earned badges belongs to the storage layer.

use serde::{Deserialize, Serialize};

use crate::metrics::calculator::pace_seconds_per_km;
use crate::social::types::ProfileStatistics;

/// What a badge measures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCriteria {
    /// Complete this many sessions
    TotalSessions(u32),
    /// Cover this many kilometers lifetime
    TotalDistanceKm(f64),
    /// Finish a session faster than this pace (seconds per km)
    PaceUnderSecondsPerKm(f64),
}

/// Badge definition with evaluation state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub criteria: BadgeCriteria,
    /// Whether the badge has been earned.
    #[serde(default)]
    pub earned: bool,
    /// Current progress towards the badge.
    #[serde(default)]
    pub progress: f64,
    /// Target value for display.
    #[serde(default)]
    pub target: f64,
}

/// Default badge definitions.
pub fn default_badges() -> Vec<Badge> {
    vec![
        Badge {
            id: "first_run".to_string(),
            name: "First Run".to_string(),
            description: "Complete your first run".to_string(),
            icon: "🥇".to_string(),
            criteria: BadgeCriteria::TotalSessions(1),
            earned: false,
            progress: 0.0,
            target: 1.0,
        },
        Badge {
            id: "total_10km".to_string(),
            name: "10km Total".to_string(),
            description: "Run 10 km total".to_string(),
            icon: "🏃".to_string(),
            criteria: BadgeCriteria::TotalDistanceKm(10.0),
            earned: false,
            progress: 0.0,
            target: 10.0,
        },
        Badge {
            id: "sprinter".to_string(),
            name: "Sprinter".to_string(),
            description: "Finish a run faster than 5:00 min/km".to_string(),
            icon: "⚡".to_string(),
            criteria: BadgeCriteria::PaceUnderSecondsPerKm(300.0),
            earned: false,
            progress: 0.0,
            target: 300.0,
        },
    ]
}

/// Evaluate badges against current statistics.
///
/// `best_session_pace` is the fastest finishing pace seen across completed
/// sessions, if any; it drives pace-based criteria.
pub fn evaluate_badges(
    stats: &ProfileStatistics,
    best_session_pace: Option<f64>,
) -> Vec<Badge> {
    let mut badges = default_badges();

    for badge in &mut badges {
        match badge.criteria {
            BadgeCriteria::TotalSessions(target) => {
                badge.progress = stats.total_sessions as f64;
                badge.earned = stats.total_sessions >= target;
            }
            BadgeCriteria::TotalDistanceKm(target) => {
                badge.progress = stats.total_distance_meters / 1000.0;
                badge.earned = badge.progress >= target;
            }
            BadgeCriteria::PaceUnderSecondsPerKm(target) => {
                if let Some(pace) = best_session_pace {
                    badge.progress = pace;
                    badge.earned = pace < target;
                }
            }
        }
    }

    badges
}

/// Best (lowest) finishing pace across elapsed/distance pairs.
pub fn best_pace(sessions: impl IntoIterator<Item = (u32, f64)>) -> Option<f64> {
    sessions
        .into_iter()
        .filter_map(|(elapsed, distance)| pace_seconds_per_km(elapsed, distance))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}
