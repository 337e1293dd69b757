//! Fastest-window extraction for a target distance.
//!
//! Both input variants are reduced to a dense list of `(distance, elapsed)`
//! samples and fed to the same two-pointer window:
//!
//! - a recorded time series, with real elapsed seconds;
//! - a route geometry plus the workout's total duration, with elapsed time
//!   interpolated linearly along the distance. This hides any pace variation
//!   inside the workout, so results carry [`ExtractionMethod::RouteEstimate`].

use geo::{Coord, LineString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    errors::AnalyticsError,
    geo_math,
    models::{ExtractionMethod, TimeSeriesPoint, TrackPoint, Workout},
    splits::DISTANCE_EPSILON_METERS,
};

/// The fastest sub-range found for one target distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffortWindow {
    pub duration_seconds: f64,
    /// Index of the first sample in the source sequence.
    pub start_index: usize,
    /// Index of the last sample in the source sequence.
    pub end_index: usize,
    /// Distance actually covered, at least the target.
    pub distance_meters: f64,
    pub method: ExtractionMethod,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    distance: f64,
    elapsed: f64,
    index: usize,
}

/// One input variant, already reduced to usable samples.
#[derive(Debug, Clone)]
pub struct EffortSource {
    samples: Vec<Sample>,
    total_distance: f64,
    method: ExtractionMethod,
}

impl EffortSource {
    /// Samples carrying a distance, ordered by elapsed time.
    pub fn time_series(points: &[TimeSeriesPoint]) -> Self {
        let mut samples: Vec<Sample> = points
            .iter()
            .enumerate()
            .filter_map(|(index, p)| {
                p.distance_meters.map(|distance| Sample {
                    distance,
                    elapsed: p.elapsed_seconds as f64,
                    index,
                })
            })
            .collect();
        if !samples.is_sorted_by(|a, b| a.elapsed <= b.elapsed) {
            samples.sort_by(|a, b| a.elapsed.total_cmp(&b.elapsed));
        }
        let total_distance = samples
            .iter()
            .map(|s| s.distance)
            .fold(0.0, f64::max);

        Self {
            samples,
            total_distance,
            method: ExtractionMethod::TimeSeries,
        }
    }

    /// Route coordinates with elapsed time estimated as
    /// `duration * cumulative / total`.
    pub fn route_estimate(route: &LineString, duration_seconds: f64) -> Self {
        let cumulative = geo_math::cumulative_distances(route.points());
        let total_distance = cumulative.last().copied().unwrap_or(0.0);

        let samples = if total_distance > 0.0 && duration_seconds > 0.0 {
            cumulative
                .iter()
                .enumerate()
                .map(|(index, &distance)| Sample {
                    distance,
                    elapsed: duration_seconds * (distance / total_distance),
                    index,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            samples,
            total_distance,
            method: ExtractionMethod::RouteEstimate,
        }
    }

    pub fn method(&self) -> ExtractionMethod {
        self.method
    }

    pub fn usable_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Minimum-duration window covering at least `target_meters`.
    pub fn fastest(&self, target_meters: f64) -> Option<EffortWindow> {
        if self.samples.len() < 2 || target_meters.is_nan() || target_meters <= 0.0 {
            return None;
        }
        if self.method == ExtractionMethod::RouteEstimate
            && self.total_distance + DISTANCE_EPSILON_METERS < target_meters
        {
            return None;
        }

        let samples = &self.samples;
        let covers = |start: usize, end: usize| {
            samples[end].distance - samples[start].distance + DISTANCE_EPSILON_METERS
                >= target_meters
        };

        let mut best: Option<EffortWindow> = None;
        let mut start = 0;
        for end in 1..samples.len() {
            if !covers(start, end) {
                continue;
            }
            self.consider(&mut best, start, end);
            while start + 1 < end && covers(start + 1, end) {
                start += 1;
                self.consider(&mut best, start, end);
            }
        }
        best
    }

    fn consider(&self, best: &mut Option<EffortWindow>, start: usize, end: usize) {
        let (s, e) = (self.samples[start], self.samples[end]);
        let duration = e.elapsed - s.elapsed;
        if duration <= 0.0 {
            return;
        }
        if best.is_none_or(|b| duration < b.duration_seconds) {
            *best = Some(EffortWindow {
                duration_seconds: duration,
                start_index: s.index,
                end_index: e.index,
                distance_meters: e.distance - s.distance,
                method: self.method,
            });
        }
    }
}

/// Every input variant one workout offers, prepared once and reused across
/// target distances.
#[derive(Debug, Clone)]
pub struct WorkoutEfforts {
    time_series: Option<EffortSource>,
    route: Option<EffortSource>,
}

impl WorkoutEfforts {
    /// Never fails: an unusable route is logged and left out.
    pub fn prepare(workout: &Workout) -> Self {
        let time_series = (!workout.time_series.is_empty())
            .then(|| EffortSource::time_series(&workout.time_series));

        let route = match workout.route_geojson.as_deref() {
            None => None,
            Some(json) => match parse_route(json) {
                Ok(line) => Some(EffortSource::route_estimate(&line, workout.duration_seconds)),
                Err(e) => {
                    warn!("Ignoring route of workout {}: {e}", workout.id);
                    None
                }
            },
        };

        Self { time_series, route }
    }

    /// Time series first, route estimate as fallback.
    pub fn fastest(&self, target_meters: f64) -> Option<EffortWindow> {
        if let Some(window) = self.time_series.as_ref().and_then(|s| s.fastest(target_meters)) {
            return Some(window);
        }
        self.route.as_ref().and_then(|s| s.fastest(target_meters))
    }

    pub fn has_source(&self) -> bool {
        self.time_series.is_some() || self.route.is_some()
    }
}

/// One-shot extraction for a single workout and target.
pub fn best_effort(workout: &Workout, target_meters: f64) -> Option<EffortWindow> {
    let window = WorkoutEfforts::prepare(workout).fastest(target_meters);
    debug!(
        "Best effort for {target_meters} m on workout {}: {:?}",
        workout.id,
        window.map(|w| w.duration_seconds)
    );
    window
}

/// Derives time-series samples from a timestamped track. Points without a
/// timestamp still contribute distance but produce no sample.
pub fn time_series_from_track(points: &[TrackPoint]) -> Vec<TimeSeriesPoint> {
    let Some(origin) = points.iter().find_map(|p| p.timestamp) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len());
    let mut distance = 0.0;
    let mut prev: Option<&TrackPoint> = None;
    for p in points {
        if let Some(prev) = prev {
            distance += geo_math::track_point_distance(prev, p);
        }
        prev = Some(p);
        if let Some(ts) = p.timestamp {
            out.push(TimeSeriesPoint::new(
                (ts - origin).whole_seconds(),
                Some(distance),
            ));
        }
    }
    out
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum GeoJson {
    LineString { coordinates: Vec<Vec<f64>> },
    Feature { geometry: Option<Box<GeoJson>> },
}

/// Parses a GeoJSON LineString, bare or wrapped in a Feature.
pub fn parse_route(json: &str) -> Result<LineString, AnalyticsError> {
    let mut geometry: GeoJson = serde_json::from_str(json)?;
    loop {
        match geometry {
            GeoJson::Feature { geometry: Some(inner) } => geometry = *inner,
            GeoJson::Feature { geometry: None } => {
                return Err(AnalyticsError::RouteGeometry(
                    "feature has no geometry".to_string(),
                ));
            }
            GeoJson::LineString { coordinates } => return line_from_positions(coordinates),
        }
    }
}

fn line_from_positions(positions: Vec<Vec<f64>>) -> Result<LineString, AnalyticsError> {
    let coords = positions
        .into_iter()
        .enumerate()
        .map(|(i, pos)| match pos.as_slice() {
            [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Ok(Coord { x: *lon, y: *lat }),
            _ => Err(AnalyticsError::RouteGeometry(format!(
                "position {i} is not a finite [lon, lat] pair"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if coords.len() < 2 {
        return Err(AnalyticsError::RouteGeometry(format!(
            "line string needs at least 2 positions, got {}",
            coords.len()
        )));
    }
    Ok(LineString::new(coords))
}
