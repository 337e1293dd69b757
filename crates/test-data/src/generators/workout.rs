//! Workout generation from tracks.

use analytics::{TrackPoint, Workout, best_effort::time_series_from_track, geo_math};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::config::{CorpusConfig, SourceMode};
use crate::profiles::RunnerProfile;
use crate::sources::{self, LineTrack, ProceduralGenerator};

/// 2024-01-01T00:00:00Z, first day of every generated corpus.
const CORPUS_EPOCH_SECONDS: i64 = 1_704_067_200;

/// A workout together with the track it was built from.
#[derive(Debug, Clone)]
pub struct GeneratedWorkout {
    pub workout: Workout,
    pub track: Vec<TrackPoint>,
    pub mode: SourceMode,
    pub base_pace_seconds_per_km: f64,
}

/// Builds a workout from a timestamped track.
///
/// Distance and duration are measured on the track; `mode` decides whether
/// the time series and route are attached.
pub fn workout_from_track(track: &[TrackPoint], mode: SourceMode) -> Workout {
    let distance = geo_math::track_distance(track);
    let first = track.iter().find_map(|p| p.timestamp);
    let last = track.iter().rev().find_map(|p| p.timestamp);
    let duration = match (first, last) {
        (Some(start), Some(end)) => (end - start).as_seconds_f64(),
        _ => 0.0,
    };
    let workout = Workout::new(distance, duration, first.unwrap_or(OffsetDateTime::UNIX_EPOCH));

    match mode {
        SourceMode::Full => workout
            .with_time_series(time_series_from_track(track))
            .with_route(sources::route_geojson(track)),
        SourceMode::RouteOnly => workout.with_route(sources::route_geojson(track)),
        SourceMode::SummaryOnly => workout,
    }
}

/// Builds a workout from a scripted line track, using its exact cumulative
/// distances for the time series.
pub fn workout_from_line(line: &LineTrack, mode: SourceMode) -> Workout {
    let points = line.track_points();
    let started_at = points
        .first()
        .and_then(|p| p.timestamp)
        .unwrap_or(OffsetDateTime::UNIX_EPOCH);
    let workout = Workout::new(line.total_distance(), line.total_duration(), started_at);

    match mode {
        SourceMode::Full => workout
            .with_time_series(line.time_series())
            .with_route(sources::route_geojson(&points)),
        SourceMode::RouteOnly => workout.with_route(sources::route_geojson(&points)),
        SourceMode::SummaryOnly => workout,
    }
}

/// Generates runner workouts over a region.
#[derive(Debug, Clone)]
pub struct WorkoutGenerator {
    config: CorpusConfig,
}

impl WorkoutGenerator {
    pub fn new(config: CorpusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Generates the `index`-th workout of a corpus, one day after the
    /// previous one.
    pub fn generate(&self, index: usize, rng: &mut impl Rng) -> GeneratedWorkout {
        let (min_d, max_d) = self.config.distance_range_m;
        let (min_p, max_p) = self.config.pace_range_s_per_km;
        let distance = rng.gen_range(min_d..max_d);
        let pace = rng.gen_range(min_p..max_p);
        let mode = self.config.source_mode(rng.r#gen::<f64>());

        let started_at = OffsetDateTime::UNIX_EPOCH
            + Duration::seconds(CORPUS_EPOCH_SECONDS)
            + Duration::days(index as i64)
            + Duration::hours(rng.gen_range(6..20));

        let profile = RunnerProfile::with_pace(pace);
        let track = ProceduralGenerator::new(rng.r#gen::<u32>())
            .with_bounds(self.config.region)
            .with_distance(distance)
            .with_start_time(started_at)
            .with_point_spacing(self.config.point_spacing_m)
            .with_gps_jitter(1.0)
            .with_pauses(0.002, 20.0, 90.0)
            .generate(&profile, rng);

        let workout = workout_from_track(&track, mode);
        debug!(
            "Generated workout {} ({:.0} m, {:?}, {} points)",
            workout.id,
            workout.distance_meters,
            mode,
            track.len()
        );

        GeneratedWorkout {
            workout,
            track,
            mode,
            base_pace_seconds_per_km: profile.pace_seconds_per_km(),
        }
    }

    /// Generates the whole corpus from the configured seed.
    pub fn generate_corpus(&self) -> Vec<GeneratedWorkout> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        (0..self.config.workout_count)
            .map(|i| self.generate(i, &mut rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> CorpusConfig {
        CorpusConfig {
            workout_count: 4,
            distance_range_m: (1_000.0, 2_000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_workout_from_track_modes() {
        let line = LineTrack::constant(2000.0, 600.0).spacing(100.0);
        let track = line.track_points();

        let full = workout_from_track(&track, SourceMode::Full);
        assert!((full.distance_meters - 2000.0).abs() < 1e-6);
        assert_eq!(full.duration_seconds, 600.0);
        assert_eq!(full.time_series.len(), track.len());
        assert!(full.route_geojson.is_some());

        let route_only = workout_from_track(&track, SourceMode::RouteOnly);
        assert!(route_only.time_series.is_empty());
        assert!(route_only.route_geojson.is_some());

        let summary = workout_from_track(&track, SourceMode::SummaryOnly);
        assert!(summary.time_series.is_empty());
        assert!(summary.route_geojson.is_none());
    }

    #[test]
    fn test_workout_from_line_totals() {
        let line = LineTrack::new().spacing(50.0).section(1000.0, 300.0).section(1000.0, 240.0);
        let workout = workout_from_line(&line, SourceMode::Full);
        assert_eq!(workout.distance_meters, 2000.0);
        assert_eq!(workout.duration_seconds, 540.0);
        assert_eq!(workout.time_series.last().unwrap().elapsed_seconds, 540);
    }

    #[test]
    fn test_corpus_is_seeded() {
        let generator = WorkoutGenerator::new(small_config());
        let a = generator.generate_corpus();
        let b = generator.generate_corpus();
        assert_eq!(a.len(), 4);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.track, y.track);
            assert_eq!(x.mode, y.mode);
        }
    }

    #[test]
    fn test_corpus_workouts_are_consistent() {
        let generator = WorkoutGenerator::new(small_config());
        for (i, generated) in generator.generate_corpus().iter().enumerate() {
            let w = &generated.workout;
            assert!(w.distance_meters > 900.0);
            assert!(w.duration_seconds > 0.0);
            assert_eq!(
                (w.started_at - OffsetDateTime::UNIX_EPOCH).whole_days(),
                CORPUS_EPOCH_SECONDS / 86_400 + i as i64
            );
        }
    }

    #[test]
    fn test_corpus_tracks_follow_config() {
        let config = small_config();
        let generator = WorkoutGenerator::new(config.clone());
        let margin = 0.01;
        for generated in generator.generate_corpus() {
            let first = generated.track[0];
            assert!(first.latitude > config.region.min_lat - margin);
            assert!(first.latitude < config.region.max_lat + margin);
            assert!(first.longitude > config.region.min_lon - margin);
            assert!(first.longitude < config.region.max_lon + margin);
            assert_eq!(first.timestamp, Some(generated.workout.started_at));

            let (min_p, max_p) = config.pace_range_s_per_km;
            assert!(generated.base_pace_seconds_per_km >= min_p - 1e-9);
            assert!(generated.base_pace_seconds_per_km <= max_p + 1e-9);
        }
    }
}
