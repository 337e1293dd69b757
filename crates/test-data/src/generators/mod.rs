//! Entity generators for test data.
//!
//! - [`WorkoutGenerator`]: workouts and seeded corpora built from generated tracks

pub mod workout;

pub use workout::{GeneratedWorkout, WorkoutGenerator, workout_from_line, workout_from_track};
