//! Deterministic straight-line tracks with scripted pacing.
//!
//! Tracks run due north from (0, 0) at the Unix epoch so that consecutive fixes are
//! exactly `spacing` meters apart under the engine's Haversine model, which
//! makes expected distances and durations easy to state in tests.

use analytics::{TimeSeriesPoint, TrackPoint, geo_math::EARTH_RADIUS_METERS};
use time::{Duration, OffsetDateTime};

/// A stretch of the track run at a constant pace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaceSection {
    pub distance_meters: f64,
    pub seconds_per_km: f64,
}

/// Elevation model applied along the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElevationShape {
    None,
    /// Linear climb of `gain` meters over the whole track.
    Ramp { base: f64, gain: f64 },
    /// Alternates between `base` and `base + amplitude` on every sample.
    Sawtooth { base: f64, amplitude: f64 },
}

impl ElevationShape {
    fn at(&self, index: usize, fraction: f64) -> Option<f64> {
        match *self {
            ElevationShape::None => None,
            ElevationShape::Ramp { base, gain } => Some(base + gain * fraction),
            ElevationShape::Sawtooth { base, amplitude } => {
                Some(if index % 2 == 0 { base } else { base + amplitude })
            }
        }
    }
}

/// Builder for a straight, northbound synthetic track.
#[derive(Debug, Clone)]
pub struct LineTrack {
    spacing_m: f64,
    sections: Vec<PaceSection>,
    elevation: ElevationShape,
    timestamps: bool,
}

impl Default for LineTrack {
    fn default() -> Self {
        Self {
            spacing_m: 10.0,
            sections: Vec::new(),
            elevation: ElevationShape::None,
            timestamps: true,
        }
    }
}

impl LineTrack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constant pace over the whole distance.
    pub fn constant(distance_meters: f64, duration_seconds: f64) -> Self {
        Self::new().section(distance_meters, duration_seconds / (distance_meters / 1000.0))
    }

    pub fn spacing(mut self, meters: f64) -> Self {
        self.spacing_m = meters;
        self
    }

    /// Appends a stretch run at `seconds_per_km`.
    pub fn section(mut self, distance_meters: f64, seconds_per_km: f64) -> Self {
        self.sections.push(PaceSection {
            distance_meters,
            seconds_per_km,
        });
        self
    }

    pub fn elevation(mut self, shape: ElevationShape) -> Self {
        self.elevation = shape;
        self
    }

    /// Leaves every point without a timestamp, like a route-only import.
    pub fn without_timestamps(mut self) -> Self {
        self.timestamps = false;
        self
    }

    pub fn total_distance(&self) -> f64 {
        self.sections.iter().map(|s| s.distance_meters).sum()
    }

    pub fn total_duration(&self) -> f64 {
        self.sections
            .iter()
            .map(|s| s.distance_meters / 1000.0 * s.seconds_per_km)
            .sum()
    }

    /// Cumulative `(distance, elapsed)` per sample.
    fn samples(&self) -> Vec<(f64, f64)> {
        let mut out = vec![(0.0, 0.0)];
        let mut distance = 0.0;
        let mut elapsed = 0.0;
        for section in &self.sections {
            let steps = (section.distance_meters / self.spacing_m).round().max(1.0) as usize;
            let step = section.distance_meters / steps as f64;
            let step_seconds = step * section.seconds_per_km / 1000.0;
            for _ in 0..steps {
                distance += step;
                elapsed += step_seconds;
                out.push((distance, elapsed));
            }
        }
        out
    }

    pub fn track_points(&self) -> Vec<TrackPoint> {
        let samples = self.samples();
        let total = self.total_distance();
        samples
            .iter()
            .enumerate()
            .map(|(i, &(distance, elapsed))| {
                let fraction = if total > 0.0 { distance / total } else { 0.0 };
                TrackPoint {
                    latitude: (distance / EARTH_RADIUS_METERS).to_degrees(),
                    longitude: 0.0,
                    elevation: self.elevation.at(i, fraction),
                    timestamp: self
                        .timestamps
                        .then(|| OffsetDateTime::UNIX_EPOCH + Duration::seconds_f64(elapsed)),
                }
            })
            .collect()
    }

    /// Per-sample log with exact cumulative distances and rounded elapsed
    /// seconds.
    pub fn time_series(&self) -> Vec<TimeSeriesPoint> {
        self.samples()
            .into_iter()
            .map(|(distance, elapsed)| TimeSeriesPoint::new(elapsed.round() as i64, Some(distance)))
            .collect()
    }

    /// GeoJSON LineString of the track.
    pub fn route_geojson(&self) -> String {
        super::route_geojson(&self.track_points())
    }
}
