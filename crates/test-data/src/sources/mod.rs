//! Track geometry sources.
//!
//! - [`LineTrack`]: deterministic straight-line tracks with scripted pacing
//! - [`ProceduralGenerator`]: random-walk tracks timed by an athlete profile

mod procedural;
mod synthetic;

use analytics::TrackPoint;
use serde_json::json;

pub use procedural::ProceduralGenerator;
pub use synthetic::{ElevationShape, LineTrack, PaceSection};

/// Encodes a track as a GeoJSON LineString of `[lon, lat]` positions.
pub fn route_geojson(points: &[TrackPoint]) -> String {
    let coordinates: Vec<[f64; 2]> = points.iter().map(|p| [p.longitude, p.latitude]).collect();
    json!({ "type": "LineString", "coordinates": coordinates }).to_string()
}
