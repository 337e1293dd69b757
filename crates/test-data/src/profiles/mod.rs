//! Athletic performance profiles.
//!
//! Profiles turn terrain grade into a running speed so generated tracks get
//! plausible timestamps.

mod runner;

pub use runner::RunnerProfile;

use rand_distr::{Distribution, Normal};

pub trait AthleteProfile: Send + Sync {
    /// Base speed on flat terrain in meters per second.
    fn base_speed_mps(&self) -> f64;

    /// Speed multiplier for a grade expressed as a fraction (0.05 = 5%).
    /// Below 1.0 is slower than base, above 1.0 faster.
    fn grade_factor(&self, grade: f64) -> f64;

    /// Day-to-day variation as a coefficient of variation.
    fn variance(&self) -> f64;
}

/// Speed for a grade with a sampled variance factor applied, never below
/// 0.5 m/s.
pub fn speed_at_grade(profile: &dyn AthleteProfile, grade: f64, variance_factor: f64) -> f64 {
    let target = profile.base_speed_mps() * profile.grade_factor(grade);
    (target * variance_factor).max(0.5)
}

/// Samples a speed multiplier around 1.0 from the profile's variance.
pub fn sample_variance(profile: &dyn AthleteProfile, rng: &mut impl rand::Rng) -> f64 {
    match Normal::new(1.0, profile.variance()) {
        Ok(normal) if profile.variance() > 0.0 => normal.sample(rng).clamp(0.7, 1.4),
        _ => 1.0,
    }
}
