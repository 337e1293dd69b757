use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// One recorded GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub timestamp: Option<OffsetDateTime>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            timestamp: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_timestamp(mut self, timestamp: OffsetDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The fix as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// One sensor sample indexed by elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub elapsed_seconds: i64,
    /// Cumulative distance from the workout start.
    pub distance_meters: Option<f64>,
    pub heart_rate: Option<i32>,
    pub cadence: Option<i32>,
    pub power: Option<i32>,
}

impl TimeSeriesPoint {
    pub fn new(elapsed_seconds: i64, distance_meters: Option<f64>) -> Self {
        Self {
            elapsed_seconds,
            distance_meters,
            ..Default::default()
        }
    }
}

/// A workout as handed over by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub started_at: OffsetDateTime,
    /// GeoJSON LineString (bare geometry or wrapped in a Feature).
    pub route_geojson: Option<String>,
    pub time_series: Vec<TimeSeriesPoint>,
}

impl Workout {
    pub fn new(distance_meters: f64, duration_seconds: f64, started_at: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            distance_meters,
            duration_seconds,
            started_at,
            route_geojson: None,
            time_series: Vec::new(),
        }
    }

    pub fn with_route(mut self, geojson: impl Into<String>) -> Self {
        self.route_geojson = Some(geojson.into());
        self
    }

    pub fn with_time_series(mut self, samples: Vec<TimeSeriesPoint>) -> Self {
        self.time_series = samples;
        self
    }
}

/// A fixed-distance chunk of a workout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub index: usize,
    /// Actual distance covered by this split, not cumulative.
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub pace_seconds_per_km: f64,
}

/// Per-workout aggregates derived from a track.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub elevation_gain_meters: Option<f64>,
    pub elevation_loss_meters: Option<f64>,
    pub min_elevation_meters: Option<f64>,
    pub max_elevation_meters: Option<f64>,
    pub average_pace_seconds_per_km: Option<f64>,
}

/// How a best-effort time was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Real elapsed times from a per-sample log.
    TimeSeries,
    /// Times interpolated linearly along the route from the total duration.
    RouteEstimate,
}

/// The standard race distances tracked by the best-effort catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardDistance {
    #[serde(rename = "400m")]
    Meters400,
    #[serde(rename = "1/2 mile")]
    HalfMile,
    #[serde(rename = "1K")]
    Km1,
    #[serde(rename = "1 mile")]
    Mile1,
    #[serde(rename = "2 mile")]
    Mile2,
    #[serde(rename = "5K")]
    Km5,
    #[serde(rename = "10K")]
    Km10,
    #[serde(rename = "15K")]
    Km15,
    #[serde(rename = "10 mile")]
    Mile10,
    #[serde(rename = "20K")]
    Km20,
    #[serde(rename = "Half-Marathon")]
    HalfMarathon,
    #[serde(rename = "30K")]
    Km30,
    #[serde(rename = "Marathon")]
    Marathon,
}

impl StandardDistance {
    /// All distances, shortest first.
    pub const ALL: [StandardDistance; 13] = [
        StandardDistance::Meters400,
        StandardDistance::HalfMile,
        StandardDistance::Km1,
        StandardDistance::Mile1,
        StandardDistance::Mile2,
        StandardDistance::Km5,
        StandardDistance::Km10,
        StandardDistance::Km15,
        StandardDistance::Mile10,
        StandardDistance::Km20,
        StandardDistance::HalfMarathon,
        StandardDistance::Km30,
        StandardDistance::Marathon,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            StandardDistance::Meters400 => "400m",
            StandardDistance::HalfMile => "1/2 mile",
            StandardDistance::Km1 => "1K",
            StandardDistance::Mile1 => "1 mile",
            StandardDistance::Mile2 => "2 mile",
            StandardDistance::Km5 => "5K",
            StandardDistance::Km10 => "10K",
            StandardDistance::Km15 => "15K",
            StandardDistance::Mile10 => "10 mile",
            StandardDistance::Km20 => "20K",
            StandardDistance::HalfMarathon => "Half-Marathon",
            StandardDistance::Km30 => "30K",
            StandardDistance::Marathon => "Marathon",
        }
    }

    pub const fn meters(self) -> f64 {
        match self {
            StandardDistance::Meters400 => 400.0,
            StandardDistance::HalfMile => 804.672,
            StandardDistance::Km1 => 1000.0,
            StandardDistance::Mile1 => 1609.344,
            StandardDistance::Mile2 => 3218.688,
            StandardDistance::Km5 => 5000.0,
            StandardDistance::Km10 => 10000.0,
            StandardDistance::Km15 => 15000.0,
            StandardDistance::Mile10 => 16093.44,
            StandardDistance::Km20 => 20000.0,
            StandardDistance::HalfMarathon => 21097.5,
            StandardDistance::Km30 => 30000.0,
            StandardDistance::Marathon => 42195.0,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Distances a workout of the given length can attempt, longest first.
    pub fn reachable(distance_meters: f64) -> impl Iterator<Item = StandardDistance> {
        Self::ALL
            .into_iter()
            .rev()
            .filter(move |d| distance_meters >= d.meters())
    }
}

impl fmt::Display for StandardDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fastest known time for one standard distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestEffortRecord {
    #[serde(rename = "distance_name")]
    pub distance: StandardDistance,
    pub target_distance_meters: f64,
    pub time_seconds: f64,
    pub source_workout_id: Uuid,
    pub source_workout_date: OffsetDateTime,
    pub calculated_at: OffsetDateTime,
    pub method: ExtractionMethod,
}

impl BestEffortRecord {
    pub fn new(
        distance: StandardDistance,
        time_seconds: f64,
        workout: &Workout,
        method: ExtractionMethod,
    ) -> Self {
        Self {
            distance,
            target_distance_meters: distance.meters(),
            time_seconds,
            source_workout_id: workout.id,
            source_workout_date: workout.started_at,
            calculated_at: OffsetDateTime::now_utc(),
            method,
        }
    }

    pub fn distance_name(&self) -> &'static str {
        self.distance.name()
    }

    /// Strict improvement; an exact tie is not faster.
    pub fn is_faster_than(&self, other: &BestEffortRecord) -> bool {
        self.time_seconds < other.time_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_distance_table() {
        let expected = [
            ("400m", 400.0),
            ("1/2 mile", 804.672),
            ("1K", 1000.0),
            ("1 mile", 1609.344),
            ("2 mile", 3218.688),
            ("5K", 5000.0),
            ("10K", 10000.0),
            ("15K", 15000.0),
            ("10 mile", 16093.44),
            ("20K", 20000.0),
            ("Half-Marathon", 21097.5),
            ("30K", 30000.0),
            ("Marathon", 42195.0),
        ];
        assert_eq!(StandardDistance::ALL.len(), expected.len());
        for (d, (name, meters)) in StandardDistance::ALL.iter().zip(expected) {
            assert_eq!(d.name(), name);
            assert_eq!(d.meters().to_bits(), f64::to_bits(meters));
            assert_eq!(StandardDistance::from_name(name), Some(*d));
        }
    }

    #[test]
    fn test_distances_sorted_ascending() {
        for pair in StandardDistance::ALL.windows(2) {
            assert!(pair[0].meters() < pair[1].meters());
        }
    }

    #[test]
    fn test_reachable_longest_first() {
        let reachable: Vec<_> = StandardDistance::reachable(5000.0).collect();
        assert_eq!(reachable.first(), Some(&StandardDistance::Km5));
        assert_eq!(reachable.last(), Some(&StandardDistance::Meters400));
        assert_eq!(reachable.len(), 6);
        assert_eq!(StandardDistance::reachable(399.9).count(), 0);
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&StandardDistance::HalfMarathon).unwrap();
        assert_eq!(json, "\"Half-Marathon\"");
        let back: StandardDistance = serde_json::from_str("\"1/2 mile\"").unwrap();
        assert_eq!(back, StandardDistance::HalfMile);
    }
}
