//! End-to-end checks of per-workout analysis on generated tracks.

use analytics::{
    AnalyticsConfig, ElevationFilter, ElevationFilterConfig, SplitConfig, SplitUnit,
    analyze_workout, calculate_splits, geo_math,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use test_data::prelude::*;

#[test]
fn test_one_kilometer_in_four_steps() {
    let points = LineTrack::constant(1000.0, 200.0).spacing(250.0).track_points();
    assert_eq!(points.len(), 5);

    let splits = calculate_splits(&points, 1000.0);
    assert_eq!(splits.len(), 1);
    assert!((splits[0].distance_meters - 1000.0).abs() < 1e-6);
    assert!((splits[0].duration_seconds - 200.0).abs() < 1e-6);
    assert!((splits[0].pace_seconds_per_km - 200.0).abs() < 1e-6);
}

#[test]
fn test_sawtooth_noise_has_no_gain() {
    let points = LineTrack::constant(2000.0, 600.0)
        .spacing(10.0)
        .elevation(ElevationShape::Sawtooth {
            base: 100.0,
            amplitude: 1.0,
        })
        .track_points();
    let filter = ElevationFilter::new(ElevationFilterConfig::default());
    assert_eq!(filter.gain(&points), None);
    assert_eq!(filter.loss(&points), None);
}

#[test]
fn test_steady_climb_counted() {
    let points = LineTrack::constant(1000.0, 300.0)
        .spacing(10.0)
        .elevation(ElevationShape::Ramp {
            base: 200.0,
            gain: 50.0,
        })
        .track_points();
    let analysis = analyze_workout(&points, &AnalyticsConfig::default());
    assert!((analysis.summary.elevation_gain_meters.unwrap() - 50.0).abs() < 1e-6);
    assert_eq!(analysis.summary.elevation_loss_meters, None);
    assert!((analysis.summary.max_elevation_meters.unwrap() - 250.0).abs() < 1e-9);
}

#[test]
fn test_procedural_splits_cover_the_track() {
    let track_gen = ProceduralGenerator::new(21).with_distance(4_300.0);
    let profile = RunnerProfile::default();
    for seed in 0..5 {
        let track = track_gen.generate(&profile, &mut StdRng::seed_from_u64(seed));
        let analysis = analyze_workout(&track, &AnalyticsConfig::default());

        let distance: f64 = analysis.splits.iter().map(|s| s.distance_meters).sum();
        let duration: f64 = analysis.splits.iter().map(|s| s.duration_seconds).sum();
        assert!((distance - analysis.summary.distance_meters).abs() < 1e-6);
        assert!((duration - analysis.summary.duration_seconds).abs() < 1e-6);
        assert!((distance - geo_math::track_distance(&track)).abs() < 1e-6);

        for (i, split) in analysis.splits.iter().enumerate() {
            assert_eq!(split.index, i);
            assert!(split.pace_seconds_per_km > 0.0);
        }
    }
}

#[test]
fn test_mile_splits_from_config() {
    let config = AnalyticsConfig {
        splits: SplitConfig::for_unit(SplitUnit::Mile),
        ..Default::default()
    };
    let points = LineTrack::constant(5000.0, 1500.0).spacing(10.0).track_points();
    let analysis = analyze_workout(&points, &config);
    // three full miles, then a 170 m tail above the 10% cutoff
    assert_eq!(analysis.splits.len(), 4);
    assert!(analysis.splits[3].distance_meters < 200.0);
}

#[test]
fn test_route_only_track_estimates_split_times() {
    let line = LineTrack::constant(3000.0, 900.0).spacing(50.0);
    let points = line.without_timestamps().track_points();
    let splits = analytics::SplitSegmenter::new(SplitConfig::default()).segment(
        &points,
        geo_math::track_distance(&points),
        900.0,
    );
    assert_eq!(splits.len(), 3);
    for split in &splits {
        assert!((split.duration_seconds - 300.0).abs() < 1e-3);
    }
}
