//! Terrain generation utilities.

mod elevation;

pub use elevation::{ElevationGenerator, add_elevation_jitter};
