//! Hysteresis filter for elevation gain and loss.
//!
//! Raw barometric or GPS elevation wobbles by a few meters even at rest, so a
//! climb is only credited once it reverses and both its height and the
//! horizontal distance it spanned clear the configured thresholds.

use geo::Point;

use crate::{
    config::ElevationFilterConfig, geo_math, models::TrackPoint, scoring::TrackMetric,
};

/// Which side of the signal a pass accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascent,
    Descent,
}

/// Running state of one filter pass.
///
/// `pending_gain` is the run in the accumulated direction and `pending_loss`
/// the run against it; a descent pass mirrors the signal so the same
/// transitions apply.
#[derive(Debug, Clone)]
pub struct ElevationAccumulator {
    config: ElevationFilterConfig,
    direction: Direction,
    total_confirmed: f64,
    pending_gain: f64,
    pending_loss: f64,
    pending_distance: f64,
    last_elevation: Option<f64>,
    last_point: Option<Point>,
}

impl ElevationAccumulator {
    pub fn new(config: ElevationFilterConfig, direction: Direction) -> Self {
        Self {
            config,
            direction,
            total_confirmed: 0.0,
            pending_gain: 0.0,
            pending_loss: 0.0,
            pending_distance: 0.0,
            last_elevation: None,
            last_point: None,
        }
    }

    pub fn gain(config: ElevationFilterConfig) -> Self {
        Self::new(config, Direction::Ascent)
    }

    pub fn loss(config: ElevationFilterConfig) -> Self {
        Self::new(config, Direction::Descent)
    }

    /// Meters committed so far, excluding any run still pending.
    pub fn total_confirmed(&self) -> f64 {
        self.total_confirmed
    }

    pub fn pending_gain(&self) -> f64 {
        self.pending_gain
    }

    pub fn pending_loss(&self) -> f64 {
        self.pending_loss
    }

    pub fn pending_distance(&self) -> f64 {
        self.pending_distance
    }

    /// Consumes one observation. A point without elevation only advances the
    /// distance window.
    pub fn observe(&mut self, point: Point, elevation: Option<f64>) {
        // distance only counts once a known elevation anchors the window
        if let (Some(last), Some(_)) = (self.last_point, self.last_elevation) {
            self.pending_distance += geo_math::distance(last, point);
        }
        self.last_point = Some(point);

        let Some(raw) = elevation else {
            return;
        };
        let current = match self.direction {
            Direction::Ascent => raw,
            Direction::Descent => -raw,
        };

        if let Some(last) = self.last_elevation {
            let diff = current - last;
            if diff > 0.0 {
                if self.pending_loss > 0.0 {
                    // reversal out of a falling run: drop it uncredited
                    self.pending_loss = 0.0;
                    self.pending_distance = 0.0;
                }
                self.pending_gain += diff;
            } else if diff < 0.0 {
                if self.pending_gain > 0.0 {
                    self.commit_pending();
                    self.pending_gain = 0.0;
                    self.pending_distance = 0.0;
                }
                self.pending_loss += diff.abs();
            }
        }
        self.last_elevation = Some(current);
    }

    fn commit_pending(&mut self) {
        if self.pending_gain >= self.config.noise_threshold_meters
            && self.pending_distance >= self.config.min_distance_meters
        {
            self.total_confirmed += self.pending_gain;
        }
    }

    /// Flushes the trailing run and returns the filtered total, or `None` when
    /// nothing measurable was accumulated.
    pub fn total(mut self) -> Option<f64> {
        self.finish()
    }
}

impl TrackMetric for ElevationAccumulator {
    type Score = Option<f64>;

    fn next_point(&mut self, point: &TrackPoint) {
        self.observe(point.point(), point.elevation);
    }

    fn finish(&mut self) -> Option<f64> {
        if self.pending_gain > 0.0 {
            self.commit_pending();
            self.pending_gain = 0.0;
            self.pending_distance = 0.0;
        }
        (self.total_confirmed > 0.0).then_some(self.total_confirmed)
    }
}

/// Stateless entry point running independent gain and loss passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElevationFilter {
    config: ElevationFilterConfig,
}

impl ElevationFilter {
    pub fn new(config: ElevationFilterConfig) -> Self {
        Self { config }
    }

    pub fn gain(&self, points: &[TrackPoint]) -> Option<f64> {
        self.run(points, Direction::Ascent)
    }

    pub fn loss(&self, points: &[TrackPoint]) -> Option<f64> {
        self.run(points, Direction::Descent)
    }

    /// `(gain, loss)` from two separate passes.
    pub fn gain_and_loss(&self, points: &[TrackPoint]) -> (Option<f64>, Option<f64>) {
        (self.gain(points), self.loss(points))
    }

    fn run(&self, points: &[TrackPoint], direction: Direction) -> Option<f64> {
        let mut acc = ElevationAccumulator::new(self.config, direction);
        for p in points {
            acc.next_point(p);
        }
        acc.finish()
    }
}

/// Lowest and highest known elevation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElevationRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl TrackMetric for ElevationRange {
    type Score = (Option<f64>, Option<f64>);

    fn next_point(&mut self, point: &TrackPoint) {
        if let Some(e) = point.elevation {
            self.min = Some(self.min.map_or(e, |m| m.min(e)));
            self.max = Some(self.max.map_or(e, |m| m.max(e)));
        }
    }

    fn finish(&mut self) -> Self::Score {
        (self.min, self.max)
    }
}
