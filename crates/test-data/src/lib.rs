//! Test data generation for the analytics engine.
//!
//! Provides deterministic line tracks with scripted pacing for exact
//! assertions, procedural random-walk tracks over Perlin terrain, and seeded
//! workout corpora for exercising best-effort recomputes.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let line = LineTrack::new()
//!     .spacing(10.0)
//!     .section(2_000.0, 300.0)
//!     .section(5_000.0, 240.0);
//! let workout = workout_from_line(&line, SourceMode::Full);
//! let corpus = WorkoutGenerator::new(CorpusConfig::default()).generate_corpus();
//! ```

pub mod config;
pub mod generators;
pub mod profiles;
pub mod sources;
pub mod terrain;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{BoundingBox, ConfigError, CorpusConfig, Region, SourceMode};
    pub use crate::generators::{
        GeneratedWorkout, WorkoutGenerator, workout_from_line, workout_from_track,
    };
    pub use crate::profiles::{AthleteProfile, RunnerProfile, sample_variance, speed_at_grade};
    pub use crate::sources::{
        ElevationShape, LineTrack, PaceSection, ProceduralGenerator, route_geojson,
    };
    pub use crate::terrain::ElevationGenerator;
}
