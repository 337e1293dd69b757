//! Configuration types for the analytics engine.

use serde::{Deserialize, Serialize};

use crate::errors::AnalyticsError;

/// Parameters of the hysteresis elevation filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationFilterConfig {
    /// Minimum size of a monotonic excursion, in meters, for it to count.
    pub noise_threshold_meters: f64,
    /// Minimum horizontal distance, in meters, the excursion must span.
    pub min_distance_meters: f64,
}

impl Default for ElevationFilterConfig {
    fn default() -> Self {
        Self {
            noise_threshold_meters: 2.0,
            min_distance_meters: 10.0,
        }
    }
}

/// Common split lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitUnit {
    Kilometer,
    Mile,
}

impl SplitUnit {
    pub const fn meters(self) -> f64 {
        match self {
            SplitUnit::Kilometer => 1000.0,
            SplitUnit::Mile => 1609.344,
        }
    }
}

/// Parameters of the split segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Nominal length of one split in meters.
    pub distance_meters: f64,
    /// A trailing remainder at least this fraction of `distance_meters` becomes
    /// its own split; anything shorter is merged into the previous one.
    pub min_remainder_fraction: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            distance_meters: SplitUnit::Kilometer.meters(),
            min_remainder_fraction: 0.1,
        }
    }
}

impl SplitConfig {
    pub fn for_unit(unit: SplitUnit) -> Self {
        Self {
            distance_meters: unit.meters(),
            ..Default::default()
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub elevation: ElevationFilterConfig,
    pub splits: SplitConfig,
}

impl AnalyticsConfig {
    /// Reads overrides from the process environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Result<Self, AnalyticsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// Recognised keys: `ELEVATION_NOISE_THRESHOLD_M`, `ELEVATION_MIN_DISTANCE_M`,
    /// `SPLIT_DISTANCE_M`, `SPLIT_MIN_REMAINDER_FRACTION`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AnalyticsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = parse_var(&lookup, "ELEVATION_NOISE_THRESHOLD_M")? {
            config.elevation.noise_threshold_meters = v;
        }
        if let Some(v) = parse_var(&lookup, "ELEVATION_MIN_DISTANCE_M")? {
            config.elevation.min_distance_meters = v;
        }
        if let Some(v) = parse_var(&lookup, "SPLIT_DISTANCE_M")? {
            config.splits.distance_meters = v;
        }
        if let Some(v) = parse_var(&lookup, "SPLIT_MIN_REMAINDER_FRACTION")? {
            config.splits.min_remainder_fraction = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalyticsError> {
        let e = &self.elevation;
        if !e.noise_threshold_meters.is_finite() || e.noise_threshold_meters < 0.0 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "noise threshold must be a non-negative number, got {}",
                e.noise_threshold_meters
            )));
        }
        if !e.min_distance_meters.is_finite() || e.min_distance_meters < 0.0 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "minimum elevation distance must be a non-negative number, got {}",
                e.min_distance_meters
            )));
        }

        let s = &self.splits;
        if !s.distance_meters.is_finite() || s.distance_meters <= 0.0 {
            return Err(AnalyticsError::InvalidConfig(format!(
                "split distance must be positive, got {}",
                s.distance_meters
            )));
        }
        if !(0.0..=1.0).contains(&s.min_remainder_fraction) {
            return Err(AnalyticsError::InvalidConfig(format!(
                "split remainder fraction must be within 0..=1, got {}",
                s.min_remainder_fraction
            )));
        }

        Ok(())
    }
}

fn parse_var<F>(lookup: &F, key: &str) -> Result<Option<f64>, AnalyticsError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| AnalyticsError::InvalidConfig(format!("{key}={raw:?}: {e}"))),
    }
}
