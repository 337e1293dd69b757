//! Configuration types for test data generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic bounding box defined by southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub const fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Returns a random point within the bounding box.
    pub fn random_point(&self, rng: &mut impl rand::Rng) -> (f64, f64) {
        let lat = rng.gen_range(self.min_lat..self.max_lat);
        let lon = rng.gen_range(self.min_lon..self.max_lon);
        (lat, lon)
    }
}

/// Pre-defined geographic regions for test data generation.
#[derive(Debug, Clone, Copy)]
pub struct Region;

impl Region {
    /// Boulder, CO area.
    pub const BOULDER: BoundingBox = BoundingBox::new(39.9, -105.5, 40.1, -105.2);
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid corpus config: {0}")]
    Invalid(String),
}

/// How generated workouts expose their data to best-effort extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    /// Time series and route geometry.
    Full,
    /// Route geometry only.
    RouteOnly,
    /// Summary totals only, nothing to extract from.
    SummaryOnly,
}

/// Configuration for a synthetic workout corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub workout_count: usize,
    pub seed: u64,
    pub region: BoundingBox,
    /// Workout distance range in meters.
    pub distance_range_m: (f64, f64),
    /// Base pace range in seconds per kilometer.
    pub pace_range_s_per_km: (f64, f64),
    pub point_spacing_m: f64,
    /// Share of workouts carrying only a route.
    pub route_only_fraction: f64,
    /// Share of workouts carrying neither route nor time series.
    pub summary_only_fraction: f64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            workout_count: 20,
            seed: 42,
            region: Region::BOULDER,
            distance_range_m: (3_000.0, 25_000.0),
            pace_range_s_per_km: (240.0, 390.0),
            point_spacing_m: 10.0,
            route_only_fraction: 0.2,
            summary_only_fraction: 0.05,
        }
    }
}

impl CorpusConfig {
    /// Reads `CORPUS_SIZE` and `CORPUS_SEED` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("CORPUS_SIZE") {
            config.workout_count = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CORPUS_SIZE",
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup("CORPUS_SEED") {
            config.seed = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CORPUS_SEED",
                value: raw.clone(),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_d, max_d) = self.distance_range_m;
        if !(min_d > 0.0 && min_d < max_d) {
            return Err(ConfigError::Invalid(format!(
                "distance range {min_d}..{max_d} must be positive and non-empty"
            )));
        }
        let (min_p, max_p) = self.pace_range_s_per_km;
        if !(min_p > 0.0 && min_p < max_p) {
            return Err(ConfigError::Invalid(format!(
                "pace range {min_p}..{max_p} must be positive and non-empty"
            )));
        }
        if self.point_spacing_m <= 0.0 {
            return Err(ConfigError::Invalid("point spacing must be positive".into()));
        }
        let shares = self.route_only_fraction + self.summary_only_fraction;
        if self.route_only_fraction < 0.0 || self.summary_only_fraction < 0.0 || shares > 1.0 {
            return Err(ConfigError::Invalid(
                "source mode fractions must be non-negative and sum to at most 1".into(),
            ));
        }
        Ok(())
    }

    /// Picks a source mode from a uniform draw in `[0, 1)`.
    pub fn source_mode(&self, draw: f64) -> SourceMode {
        if draw < self.summary_only_fraction {
            SourceMode::SummaryOnly
        } else if draw < self.summary_only_fraction + self.route_only_fraction {
            SourceMode::RouteOnly
        } else {
            SourceMode::Full
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(CorpusConfig::default().validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let config = CorpusConfig::from_lookup(lookup(&[("CORPUS_SIZE", "5"), ("CORPUS_SEED", " 7 ")]))
            .unwrap();
        assert_eq!(config.workout_count, 5);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn test_bad_env_value() {
        let err = CorpusConfig::from_lookup(lookup(&[("CORPUS_SIZE", "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "CORPUS_SIZE", .. }));
    }

    #[test]
    fn test_source_mode_split() {
        let config = CorpusConfig::default();
        assert_eq!(config.source_mode(0.0), SourceMode::SummaryOnly);
        assert_eq!(config.source_mode(0.1), SourceMode::RouteOnly);
        assert_eq!(config.source_mode(0.9), SourceMode::Full);
    }

    #[test]
    fn test_partial_json() {
        let config: CorpusConfig = serde_json::from_str(r#"{"workout_count": 3}"#).unwrap();
        assert_eq!(config.workout_count, 3);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_random_point_inside_box() {
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let (lat, lon) = Region::BOULDER.random_point(&mut rng);
            assert!((Region::BOULDER.min_lat..Region::BOULDER.max_lat).contains(&lat));
            assert!((Region::BOULDER.min_lon..Region::BOULDER.max_lon).contains(&lon));
        }
    }
}
