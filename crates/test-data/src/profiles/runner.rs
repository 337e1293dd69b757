//! Runner athletic profile.

use super::AthleteProfile;

/// Running speed model.
///
/// - Base pace: ~5:00/km (3.33 m/s)
/// - Uphill: ~15% slower per 1% grade
/// - Downhill: ~8% faster per 1% grade, capped
#[derive(Debug, Clone)]
pub struct RunnerProfile {
    base_speed: f64,
    variance: f64,
}

impl Default for RunnerProfile {
    fn default() -> Self {
        Self::with_pace(300.0)
    }
}

impl RunnerProfile {
    /// Profile with a base pace in seconds per kilometer.
    pub fn with_pace(seconds_per_km: f64) -> Self {
        Self {
            base_speed: 1000.0 / seconds_per_km,
            variance: 0.08,
        }
    }

    pub fn pace_seconds_per_km(&self) -> f64 {
        1000.0 / self.base_speed
    }
}

impl AthleteProfile for RunnerProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn grade_factor(&self, grade: f64) -> f64 {
        if grade >= 0.0 {
            (1.0 - grade * 15.0).max(0.2)
        } else {
            // grade is negative, so this speeds up
            (1.0 - grade * 8.0).min(1.5)
        }
    }

    fn variance(&self) -> f64 {
        self.variance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = RunnerProfile::default();
        assert!((profile.base_speed_mps() - 3.333).abs() < 0.01);
        assert!((profile.pace_seconds_per_km() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_grade_factors() {
        let profile = RunnerProfile::default();
        assert!((profile.grade_factor(0.0) - 1.0).abs() < 0.01);
        assert!(profile.grade_factor(0.05) < 1.0);
        assert!(profile.grade_factor(-0.05) > 1.0);
        assert_eq!(profile.grade_factor(1.0), 0.2);
    }
}
