//! Derived run metrics.
//!
//! Pure functions over the authoritative `(elapsed_seconds, distance_meters)`
//! pair. Outputs are recomputed on demand and never cached, so displayed pace
//! and energy cannot drift from the recorded totals.

/// Estimated energy expenditure per kilometer of running, in kcal.
///
/// A fixed constant calibrated for an average adult; an approximation, not
/// physiologically exact.
pub const ENERGY_KCAL_PER_KM: f64 = 65.0;

/// Derived metrics for a session at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionMetrics {
    /// Seconds per kilometer; `None` until any distance is covered
    pub pace_seconds_per_km: Option<f64>,
    /// Average speed in km/h; `None` until any time has elapsed
    pub average_speed_kmh: Option<f64>,
    /// Estimated energy expenditure in kcal
    pub energy_kcal: f64,
}

impl SessionMetrics {
    /// Compute all derived metrics from the accumulated totals.
    pub fn from_totals(elapsed_seconds: u32, distance_meters: f64) -> Self {
        Self {
            pace_seconds_per_km: pace_seconds_per_km(elapsed_seconds, distance_meters),
            average_speed_kmh: average_speed_kmh(elapsed_seconds, distance_meters),
            energy_kcal: estimated_energy_kcal(distance_meters),
        }
    }
}

/// Pace in seconds per kilometer.
///
/// `None` while no distance has been covered ("no pace yet"); never divides
/// by zero.
pub fn pace_seconds_per_km(elapsed_seconds: u32, distance_meters: f64) -> Option<f64> {
    if distance_meters <= 0.0 {
        return None;
    }
    Some(elapsed_seconds as f64 / (distance_meters / 1000.0))
}

/// Average speed in km/h, `None` while no time has elapsed.
pub fn average_speed_kmh(elapsed_seconds: u32, distance_meters: f64) -> Option<f64> {
    if elapsed_seconds == 0 {
        return None;
    }
    Some((distance_meters / 1000.0) / (elapsed_seconds as f64 / 3600.0))
}

/// Estimated energy expenditure in kcal for the distance covered.
pub fn estimated_energy_kcal(distance_meters: f64) -> f64 {
    (distance_meters / 1000.0) * ENERGY_KCAL_PER_KM
}

/// Format elapsed seconds as `MM:SS` for display.
pub fn format_elapsed(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
