//! Perlin noise-based elevation generation.

use noise::{NoiseFn, Perlin};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Generates smooth elevation surfaces from fractal Perlin noise.
#[derive(Debug, Clone)]
pub struct ElevationGenerator {
    perlin: Perlin,
    /// Base elevation in meters.
    base_elevation: f64,
    /// Amplitude of the variation around the base, in meters.
    height_scale: f64,
    /// Spatial frequency in cycles per degree.
    frequency: f64,
    octaves: u32,
}

impl ElevationGenerator {
    /// Foothills terrain around Boulder, CO.
    pub fn boulder(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            base_elevation: 1650.0,
            height_scale: 150.0,
            frequency: 30.0,
            octaves: 4,
        }
    }

    /// Elevation at a coordinate, fractal Brownian motion over the octaves.
    pub fn elevation_at(&self, lat: f64, lon: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.frequency;
        let mut max_amplitude = 0.0;

        for _ in 0..self.octaves {
            total += self.perlin.get([lat * frequency, lon * frequency]) * amplitude;
            max_amplitude += amplitude;
            amplitude *= 0.5;
            frequency *= 2.0;
        }

        let normalized = total / max_amplitude;
        self.base_elevation + normalized * self.height_scale
    }
}

/// Adds barometer-like noise to an elevation reading. A non-positive or
/// non-finite `std_dev` leaves the reading untouched.
pub fn add_elevation_jitter(elevation: f64, rng: &mut impl Rng, std_dev: f64) -> f64 {
    if !std_dev.is_finite() || std_dev <= 0.0 {
        return elevation;
    }
    match Normal::new(0.0, std_dev) {
        Ok(normal) => elevation + normal.sample(rng),
        Err(_) => elevation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_elevation_consistency() {
        let elev_gen = ElevationGenerator::boulder(42);
        let elev1 = elev_gen.elevation_at(39.5, -119.8);
        let elev2 = elev_gen.elevation_at(39.5, -119.8);
        assert!((elev1 - elev2).abs() < 0.001);
    }

    #[test]
    fn test_elevation_range() {
        let elev_gen = ElevationGenerator::boulder(42);
        let elev = elev_gen.elevation_at(40.0, -105.3);
        assert!(elev > elev_gen.base_elevation - elev_gen.height_scale);
        assert!(elev < elev_gen.base_elevation + elev_gen.height_scale);
    }

    #[test]
    fn test_seed_changes_surface() {
        let a = ElevationGenerator::boulder(1).elevation_at(40.0123, -105.3456);
        let b = ElevationGenerator::boulder(2).elevation_at(40.0123, -105.3456);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_jitter_is_identity() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(add_elevation_jitter(120.0, &mut rng, 0.0), 120.0);
        assert_ne!(add_elevation_jitter(120.0, &mut rng, 5.0), 120.0);
    }
}
