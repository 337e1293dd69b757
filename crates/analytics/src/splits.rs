//! Fixed-distance split segmentation.

use crate::{config::SplitConfig, geo_math, models::Split, models::TrackPoint};

/// Tolerance absorbing Haversine rounding when a split lands exactly on its
/// nominal length.
pub const DISTANCE_EPSILON_METERS: f64 = 1e-6;

/// A split under construction, remembering where it started in the track.
#[derive(Debug, Clone, Copy)]
struct OpenSplit {
    start_index: usize,
    end_index: usize,
    distance: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SplitSegmenter {
    config: SplitConfig,
}

impl SplitSegmenter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn with_distance(split_distance_meters: f64) -> Self {
        Self::new(SplitConfig {
            distance_meters: split_distance_meters,
            ..Default::default()
        })
    }

    /// Partitions `points` into splits.
    ///
    /// `total_distance` and `total_duration` drive the proportional duration
    /// estimate used when a split's endpoints lack timestamps.
    pub fn segment(
        &self,
        points: &[TrackPoint],
        total_distance: f64,
        total_duration: f64,
    ) -> Vec<Split> {
        let split_length = self.config.distance_meters;
        if points.len() < 2 || !split_length.is_finite() || split_length <= 0.0 {
            return Vec::new();
        }

        let mut closed: Vec<OpenSplit> = Vec::new();
        let mut accumulated = 0.0;
        let mut split_start_distance = 0.0;
        let mut split_start_index = 0;

        for i in 1..points.len() {
            accumulated += geo_math::track_point_distance(&points[i - 1], &points[i]);
            if accumulated - split_start_distance + DISTANCE_EPSILON_METERS >= split_length {
                closed.push(OpenSplit {
                    start_index: split_start_index,
                    end_index: i,
                    distance: accumulated - split_start_distance,
                });
                split_start_distance = accumulated;
                split_start_index = i;
            }
        }

        // A track shorter than one split yields nothing.
        if closed.is_empty() {
            return Vec::new();
        }

        let last_index = points.len() - 1;
        let remainder = accumulated - split_start_distance;
        if remainder > DISTANCE_EPSILON_METERS {
            if remainder >= split_length * self.config.min_remainder_fraction {
                closed.push(OpenSplit {
                    start_index: split_start_index,
                    end_index: last_index,
                    distance: remainder,
                });
            } else if let Some(prev) = closed.last_mut() {
                prev.end_index = last_index;
                prev.distance += remainder;
            }
        }

        closed
            .into_iter()
            .enumerate()
            .map(|(index, open)| {
                let duration = split_duration(points, &open, total_distance, total_duration);
                Split {
                    index,
                    distance_meters: open.distance,
                    duration_seconds: duration,
                    pace_seconds_per_km: pace_seconds_per_km(duration, open.distance),
                }
            })
            .collect()
    }
}

fn split_duration(
    points: &[TrackPoint],
    split: &OpenSplit,
    total_distance: f64,
    total_duration: f64,
) -> f64 {
    match (points[split.start_index].timestamp, points[split.end_index].timestamp) {
        (Some(start), Some(end)) => (end - start).as_seconds_f64(),
        _ if total_distance > 0.0 => (split.distance / total_distance) * total_duration,
        _ => 0.0,
    }
}

/// Seconds per kilometer, or 0 for a degenerate duration or distance.
pub fn pace_seconds_per_km(duration_seconds: f64, distance_meters: f64) -> f64 {
    if duration_seconds <= 0.0 || distance_meters <= 0.0 {
        return 0.0;
    }
    duration_seconds / (distance_meters / 1000.0)
}

/// Splits a track with the given split length, deriving totals from the track
/// itself.
pub fn calculate_splits(points: &[TrackPoint], split_distance_meters: f64) -> Vec<Split> {
    let total_distance = geo_math::track_distance(points);
    let total_duration = match (
        points.iter().find_map(|p| p.timestamp),
        points.iter().rev().find_map(|p| p.timestamp),
    ) {
        (Some(start), Some(end)) => (end - start).as_seconds_f64(),
        _ => 0.0,
    };
    SplitSegmenter::with_distance(split_distance_meters).segment(
        points,
        total_distance,
        total_duration,
    )
}
