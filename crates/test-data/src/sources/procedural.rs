//! Procedural track generation.

use analytics::{TrackPoint, geo_math};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::{Duration, OffsetDateTime};

use crate::config::BoundingBox;
use crate::profiles::{self, AthleteProfile};
use crate::terrain::ElevationGenerator;

/// Configuration for procedural track generation.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    pub started_at: OffsetDateTime,
    /// Geographic bounds for the track.
    pub bounds: BoundingBox,
    /// GPS position jitter standard deviation in meters.
    pub gps_jitter_m: f64,
    /// GPS elevation jitter standard deviation in meters.
    pub elevation_jitter_m: f64,
    /// Approximate distance between track points in meters.
    pub point_spacing_m: f64,
    /// Probability of inserting a pause (0.0 - 1.0).
    pub pause_probability: f64,
    /// Duration range for pauses (min, max) in seconds.
    pub pause_duration_range: (f64, f64),
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            started_at: OffsetDateTime::UNIX_EPOCH,
            bounds: crate::config::Region::BOULDER,
            gps_jitter_m: 3.0,
            elevation_jitter_m: 1.5,
            point_spacing_m: 10.0,
            pause_probability: 0.0,
            pause_duration_range: (30.0, 180.0),
        }
    }
}

/// Generates random-walk GPS tracks timed by an athlete profile.
#[derive(Debug, Clone)]
pub struct ProceduralGenerator {
    config: TrackConfig,
    elevation: ElevationGenerator,
}

impl ProceduralGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            config: TrackConfig::default(),
            elevation: ElevationGenerator::boulder(seed),
        }
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.config.bounds = bounds;
        self
    }

    pub fn with_start_time(mut self, at: OffsetDateTime) -> Self {
        self.config.started_at = at;
        self
    }

    pub fn with_gps_jitter(mut self, meters: f64) -> Self {
        self.config.gps_jitter_m = meters;
        self
    }

    pub fn with_point_spacing(mut self, meters: f64) -> Self {
        self.config.point_spacing_m = meters;
        self
    }

    pub fn with_pauses(mut self, probability: f64, min_sec: f64, max_sec: f64) -> Self {
        self.config.pause_probability = probability;
        self.config.pause_duration_range = (min_sec, max_sec);
        self
    }

    /// Generates a track using the specified athletic profile.
    pub fn generate(&self, profile: &dyn AthleteProfile, rng: &mut impl Rng) -> Vec<TrackPoint> {
        let start = self.config.bounds.random_point(rng);

        let path = self.generate_path(start, rng);
        self.apply_timing(path, profile, rng)
    }

    /// Random walk with momentum, coordinates only.
    pub fn generate_path(&self, start: (f64, f64), rng: &mut impl Rng) -> Vec<(f64, f64)> {
        let mut path = vec![start];
        let mut current = start;
        let mut total_distance = 0.0;
        let mut heading = rng.gen_range(0.0..std::f64::consts::TAU);

        while total_distance < self.config.distance_meters {
            heading += rng.gen_range(-0.3..0.3);
            let step = self.config.point_spacing_m * rng.gen_range(0.8..1.2);

            // Small-step approximation, ~111 km per degree of latitude
            let lat_delta = (step * heading.cos()) / 111_000.0;
            let lon_delta = (step * heading.sin()) / (111_000.0 * current.0.to_radians().cos());

            let (next_lat, next_lon, bounced) =
                self.apply_bounds(current.0 + lat_delta, current.1 + lon_delta, heading);
            heading = bounced;

            total_distance += geo_math::distance_meters(current.0, current.1, next_lat, next_lon);
            current = (next_lat, next_lon);
            path.push(current);
        }

        path
    }

    /// Clamps to bounds, reflecting the heading on contact.
    fn apply_bounds(&self, lat: f64, lon: f64, heading: f64) -> (f64, f64, f64) {
        let b = &self.config.bounds;
        let mut new_heading = heading;

        let lat = if lat < b.min_lat {
            new_heading = std::f64::consts::PI - heading;
            b.min_lat + (b.min_lat - lat).min(0.001)
        } else if lat > b.max_lat {
            new_heading = std::f64::consts::PI - heading;
            b.max_lat - (lat - b.max_lat).min(0.001)
        } else {
            lat
        };

        let lon = if lon < b.min_lon {
            new_heading = -heading;
            b.min_lon + (b.min_lon - lon).min(0.001)
        } else if lon > b.max_lon {
            new_heading = -heading;
            b.max_lon - (lon - b.max_lon).min(0.001)
        } else {
            lon
        };

        (lat, lon, new_heading)
    }

    /// Applies timestamps and noisy elevation to a path.
    fn apply_timing(
        &self,
        path: Vec<(f64, f64)>,
        profile: &dyn AthleteProfile,
        rng: &mut impl Rng,
    ) -> Vec<TrackPoint> {
        let Some(&(first_lat, first_lon)) = path.first() else {
            return Vec::new();
        };

        let jitter = Normal::new(0.0, self.config.gps_jitter_m.max(0.0) / 111_000.0).ok();
        let sample_jitter = |rng: &mut dyn rand::RngCore| -> f64 {
            jitter.as_ref().map_or(0.0, |n| n.sample(rng))
        };

        let mut result = Vec::with_capacity(path.len());
        let mut timestamp = self.config.started_at;

        let elevation = crate::terrain::add_elevation_jitter(
            self.elevation.elevation_at(first_lat, first_lon),
            rng,
            self.config.elevation_jitter_m,
        );
        result.push(
            TrackPoint::new(first_lat + sample_jitter(rng), first_lon + sample_jitter(rng))
                .with_elevation(elevation)
                .with_timestamp(timestamp),
        );

        for pair in path.windows(2) {
            let (prev_lat, prev_lon) = pair[0];
            let (lat, lon) = pair[1];

            let distance = geo_math::distance_meters(prev_lat, prev_lon, lat, lon);
            let prev_elev = self.elevation.elevation_at(prev_lat, prev_lon);
            let curr_elev = self.elevation.elevation_at(lat, lon);
            let grade = if distance > 0.0 {
                (curr_elev - prev_elev) / distance
            } else {
                0.0
            };

            let variance = profiles::sample_variance(profile, rng);
            let speed = profiles::speed_at_grade(profile, grade, variance);

            let pause_seconds = if rng.r#gen::<f64>() < self.config.pause_probability {
                let (min, max) = self.config.pause_duration_range;
                rng.gen_range(min..max)
            } else {
                0.0
            };

            timestamp += Duration::seconds_f64(distance / speed + pause_seconds);

            let elevation =
                crate::terrain::add_elevation_jitter(curr_elev, rng, self.config.elevation_jitter_m);
            result.push(
                TrackPoint::new(lat + sample_jitter(rng), lon + sample_jitter(rng))
                    .with_elevation(elevation)
                    .with_timestamp(timestamp),
            );
        }

        result
    }
}
