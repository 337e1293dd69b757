//! Great-circle distance helpers.

use geo::Point;

use crate::models::TrackPoint;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance in meters between two lat/lon pairs given in degrees.
///
/// NaN inputs propagate as NaN.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Haversine distance between two `geo` points (x = longitude, y = latitude).
pub fn distance(a: Point, b: Point) -> f64 {
    distance_meters(a.y(), a.x(), b.y(), b.x())
}

pub fn track_point_distance(a: &TrackPoint, b: &TrackPoint) -> f64 {
    distance_meters(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Running distance along a sequence of points; the first entry is always 0.
pub fn cumulative_distances<I>(points: I) -> Vec<f64>
where
    I: IntoIterator<Item = Point>,
{
    let mut out = Vec::new();
    let mut total = 0.0;
    let mut prev: Option<Point> = None;
    for p in points {
        if let Some(prev) = prev {
            total += distance(prev, p);
        }
        out.push(total);
        prev = Some(p);
    }
    out
}

pub fn track_distance(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| track_point_distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_meters(39.5, -119.8, 39.5, -119.8), 0.0);
        assert_eq!(distance_meters(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = distance_meters(40.0, -105.3, 40.02, -105.28);
        let ba = distance_meters(40.02, -105.28, 40.0, -105.3);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_latitude() {
        let dist = distance_meters(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((dist - expected).abs() < 1e-6);
    }

    #[test]
    fn test_nan_propagates() {
        assert!(distance_meters(f64::NAN, 0.0, 1.0, 0.0).is_nan());
    }

    #[test]
    fn test_cumulative_distances() {
        let pts = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.001),
            Point::new(0.0, 0.002),
        ];
        let cum = cumulative_distances(pts);
        assert_eq!(cum.len(), 3);
        assert_eq!(cum[0], 0.0);
        assert!((cum[2] - 2.0 * cum[1]).abs() < 1e-6);
        assert!(cumulative_distances(Vec::<Point>::new()).is_empty());
    }

    #[test]
    fn test_track_distance_matches_pairs() {
        let a = TrackPoint::new(40.0, -105.3);
        let b = TrackPoint::new(40.01, -105.29);
        let c = TrackPoint::new(40.02, -105.28);
        let total = track_distance(&[a, b, c]);
        let expected = track_point_distance(&a, &b) + track_point_distance(&b, &c);
        assert!((total - expected).abs() < 1e-9);
        assert_eq!(track_distance(&[a]), 0.0);
    }
}
