//! Generates a seeded workout corpus and runs the analytics engine over it.
//!
//! Run with:
//! ```
//! CORPUS_SIZE=50 cargo run -p test-data --bin recompute
//! ```
//!
//! All workouts but the last go through a full recompute; the last one is then
//! fed through the incremental update path, the way a fresh upload would be.

use analytics::{AnalyticsConfig, BestEffortCatalog, RecordChange, analyze_workout};
use test_data::config::CorpusConfig;
use test_data::generators::WorkoutGenerator;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let corpus_config = CorpusConfig::from_env()?;
    let analytics_config = AnalyticsConfig::from_env()?;

    let corpus = WorkoutGenerator::new(corpus_config).generate_corpus();
    tracing::info!("Generated {} workouts", corpus.len());

    for generated in &corpus {
        let analysis = analyze_workout(&generated.track, &analytics_config);
        tracing::debug!(
            "Workout {}: {:.0} m in {:.0} s, gain {:?}, {} splits",
            generated.workout.id,
            analysis.summary.distance_meters,
            analysis.summary.duration_seconds,
            analysis.summary.elevation_gain_meters,
            analysis.splits.len()
        );
    }

    let Some((latest, history)) = corpus.split_last() else {
        tracing::info!("Empty corpus, nothing to do");
        return Ok(());
    };

    let workouts: Vec<_> = history.iter().map(|g| g.workout.clone()).collect();
    let catalog = BestEffortCatalog::default();
    let report = catalog.recompute_all(&workouts)?;
    tracing::info!(
        "Recompute done: {} records from {} workouts ({} without a usable source)",
        report.records.len(),
        report.workouts_scanned,
        report.workouts_without_source
    );

    let changes = catalog.update_for_workout(&latest.workout)?;
    let improved = changes
        .iter()
        .filter(|c| !matches!(c, RecordChange::Kept { .. }))
        .count();
    tracing::info!(
        "Latest workout {} touched {} distances, {} written",
        latest.workout.id,
        changes.len(),
        improved
    );

    for record in catalog.records()? {
        tracing::info!(
            "  {:>14}: {:>8.1} s ({:?})",
            record.distance_name(),
            record.time_seconds,
            record.method
        );
    }

    println!("{}", serde_json::to_string_pretty(&catalog.records()?)?);

    Ok(())
}
