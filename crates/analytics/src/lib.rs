//! Track analytics engine.
//!
//! Turns normalized workout tracks into training metrics: distance,
//! noise-filtered elevation gain and loss, fixed-distance splits, and the
//! best-effort catalog of fastest times over standard race distances.
//!
//! Decoding of GPX/FIT/CSV files and persistence are left to callers; this
//! crate works on in-memory [`models::TrackPoint`], [`models::TimeSeriesPoint`]
//! and [`models::Workout`] values, in meters and seconds throughout.

pub mod best_effort;
pub mod catalog;
pub mod config;
pub mod elevation;
pub mod errors;
pub mod geo_math;
pub mod models;
pub mod scoring;
pub mod splits;

pub use best_effort::{EffortSource, EffortWindow, WorkoutEfforts, best_effort};
pub use catalog::{BestEffortCatalog, InMemoryRecordStore, RecomputeReport, RecordChange, RecordStore};
pub use config::{AnalyticsConfig, ElevationFilterConfig, SplitConfig, SplitUnit};
pub use elevation::ElevationFilter;
pub use errors::AnalyticsError;
pub use models::{
    BestEffortRecord, ExtractionMethod, Split, StandardDistance, TimeSeriesPoint, TrackPoint,
    TrackSummary, Workout,
};
pub use scoring::{WorkoutAnalysis, analyze_workout, summarize_track};
pub use splits::{SplitSegmenter, calculate_splits};
