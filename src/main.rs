//! RustRun - Social Running Tracker
//!
//! Headless entry point: runs a short simulated session against the local
//! database and reports the resulting metrics, ranking, and statistics.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rustrun::engine::clock::TickClock;
use rustrun::engine::sampler::SimulatedSampler;
use rustrun::metrics::calculator::format_elapsed;
use rustrun::social::types::RankingPeriod;
use rustrun::storage::config::{load_config, save_config};
use rustrun::storage::database::Database;
use rustrun::tracker::ActivityTracker;

/// Ticks the demo session runs for.
const DEMO_TICKS: u32 = 10;

/// Simulated motion per tick, matching a brisk 6 min/km run.
const DEMO_METERS_PER_TICK: f64 = 10.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RustRun v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("loading configuration")?;
    save_config(&config).context("saving configuration")?;

    let db_path = config.data_dir.join("rustrun.db");
    let database = Arc::new(Database::open(&db_path).context("opening database")?);

    let sampler = Box::new(SimulatedSampler::new(DEMO_METERS_PER_TICK));
    let mut tracker = ActivityTracker::with_database(&config.profile, sampler, database)
        .context("initializing tracker")?;

    tracker.start().context("starting session")?;

    let clock = TickClock::from_seconds(config.tracking.tick_interval_secs as u64);
    let mut remaining = DEMO_TICKS;
    clock
        .run(|| {
            tracker.tick();
            let snapshot = tracker.snapshot();
            tracing::info!(
                "{}  {:.2} km  {:.0} kcal",
                format_elapsed(snapshot.elapsed_seconds),
                snapshot.distance_meters / 1000.0,
                snapshot.energy_kcal
            );
            remaining -= 1;
            remaining > 0
        })
        .await;

    let outcome = tracker.stop().context("stopping session")?;
    tracing::info!("Session outcome: {outcome:?}");

    let period = RankingPeriod::containing(chrono::Utc::now());
    for (rank, entry) in tracker.ranking_for(period).iter().enumerate() {
        tracing::info!(
            "#{} {} - {:.2} km",
            rank + 1,
            entry.team,
            entry.accumulated_distance_meters / 1000.0
        );
    }

    let stats = tracker.statistics();
    tracing::info!(
        "Lifetime: {:.2} km over {} runs ({:.2} km this week)",
        stats.total_distance_meters / 1000.0,
        stats.total_sessions,
        stats.current_period_distance_meters / 1000.0
    );

    for badge in tracker.badges().iter().filter(|b| b.earned) {
        tracing::info!("Badge earned: {} {}", badge.icon, badge.name);
    }

    Ok(())
}
