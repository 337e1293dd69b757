use geo::Point;
use serde::Serialize;
use time::OffsetDateTime;

use crate::{
    config::AnalyticsConfig,
    elevation::{ElevationAccumulator, ElevationRange},
    geo_math,
    models::{Split, TrackPoint, TrackSummary},
    splits::{self, SplitSegmenter},
};

/// A single-pass accumulator over track points.
pub trait TrackMetric {
    type Score;
    fn next_point(&mut self, point: &TrackPoint);
    fn finish(&mut self) -> Self::Score;
}

/// Aggregates for one track in a single pass.
pub fn summarize_track(points: &[TrackPoint], config: &AnalyticsConfig) -> TrackSummary {
    let mut acc = Metrics::new(config);
    for point in points {
        acc.next_point(point);
    }
    acc.finish()
}

/// Everything computed for one workout's track, ready to hand to storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutAnalysis {
    pub summary: TrackSummary,
    pub splits: Vec<Split>,
}

pub fn analyze_workout(points: &[TrackPoint], config: &AnalyticsConfig) -> WorkoutAnalysis {
    let summary = summarize_track(points, config);
    let splits = SplitSegmenter::new(config.splits).segment(
        points,
        summary.distance_meters,
        summary.duration_seconds,
    );
    WorkoutAnalysis { summary, splits }
}

#[derive(Debug, Clone)]
struct Metrics {
    distance: DistanceMetric,
    duration: DurationMetric,
    gain: ElevationAccumulator,
    loss: ElevationAccumulator,
    range: ElevationRange,
}

impl Metrics {
    fn new(config: &AnalyticsConfig) -> Self {
        Self {
            distance: DistanceMetric::default(),
            duration: DurationMetric::default(),
            gain: ElevationAccumulator::gain(config.elevation),
            loss: ElevationAccumulator::loss(config.elevation),
            range: ElevationRange::default(),
        }
    }
}

impl TrackMetric for Metrics {
    type Score = TrackSummary;

    fn next_point(&mut self, point: &TrackPoint) {
        self.distance.next_point(point);
        self.duration.next_point(point);
        self.gain.next_point(point);
        self.loss.next_point(point);
        self.range.next_point(point);
    }

    fn finish(&mut self) -> TrackSummary {
        let distance_meters = self.distance.finish();
        let duration_seconds = self.duration.finish();
        let (min_elevation_meters, max_elevation_meters) = self.range.finish();
        let average_pace_seconds_per_km = (distance_meters > 0.0 && duration_seconds > 0.0)
            .then(|| splits::pace_seconds_per_km(duration_seconds, distance_meters));

        TrackSummary {
            distance_meters,
            duration_seconds,
            elevation_gain_meters: self.gain.finish(),
            elevation_loss_meters: self.loss.finish(),
            min_elevation_meters,
            max_elevation_meters,
            average_pace_seconds_per_km,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct DistanceMetric {
    total_distance: f64,
    last_point: Option<Point>,
}

impl TrackMetric for DistanceMetric {
    type Score = f64;

    fn next_point(&mut self, point: &TrackPoint) {
        let current = point.point();
        self.total_distance += self
            .last_point
            .map_or(0.0, |prev| geo_math::distance(prev, current));
        self.last_point = Some(current);
    }

    fn finish(&mut self) -> f64 {
        self.total_distance
    }
}

#[derive(Debug, Clone, Default)]
struct DurationMetric {
    start_time: Option<OffsetDateTime>,
    end_time: Option<OffsetDateTime>,
}

impl TrackMetric for DurationMetric {
    type Score = f64;

    fn next_point(&mut self, point: &TrackPoint) {
        if let Some(time) = point.timestamp {
            if self.start_time.is_none() {
                self.start_time = Some(time);
            }
            self.end_time = Some(time);
        }
    }

    fn finish(&mut self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).as_seconds_f64(),
            _ => 0.0,
        }
    }
}
