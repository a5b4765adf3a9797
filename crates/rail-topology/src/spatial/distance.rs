//! Distance and centroid helpers for station coordinates.
//!
//! Distances use the spherical law of cosines rather than Haversine so that
//! station grouping stays identical to the historical dataset.

use geo::{LineString, Point};

/// Mean Earth radius in kilometres
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points (x = lng, y = lat).
///
/// Identical points, and any rounding that pushes the `acos` argument out of
/// `[-1, 1]`, yield `0.0` instead of `NaN`.
pub fn spherical_distance_km(a: Point, b: Point) -> f64 {
    if a == b {
        return 0.0;
    }

    let (lat1, lng1) = (a.y().to_radians(), a.x().to_radians());
    let (lat2, lng2) = (b.y().to_radians(), b.x().to_radians());

    let cos_angle = lat1.cos() * lat2.cos() * (lng2 - lng1).cos() + lat1.sin() * lat2.sin();
    let distance = cos_angle.acos() * EARTH_RADIUS_KM;

    if distance.is_nan() {
        0.0
    } else {
        distance
    }
}

/// Average of the midpoints of each segment's first and last coordinate.
///
/// Returns `None` when no segment has any coordinates.
pub fn segment_centroid(segments: &[LineString]) -> Option<Point> {
    let midpoints: Vec<Point> = segments
        .iter()
        .filter_map(|segment| {
            let first = segment.0.first()?;
            let last = segment.0.last()?;
            Some(Point::new((first.x + last.x) / 2.0, (first.y + last.y) / 2.0))
        })
        .collect();

    mean_point(&midpoints)
}

/// Arithmetic mean of a set of points
pub fn mean_point(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(x, y), p| (x + p.x(), y + p.y()));

    Some(Point::new(sum_x / n, sum_y / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identical_points() {
        for p in [
            Point::new(0.0, 0.0),
            Point::new(139.7671, 35.6812),
            Point::new(-0.1276, 51.5072),
            Point::new(179.9, -89.9),
        ] {
            assert_eq!(spherical_distance_km(p, p), 0.0);
        }
    }

    #[test]
    fn test_short_distance() {
        // 0.001° of longitude on the equator
        let d = spherical_distance_km(Point::new(0.0, 0.0), Point::new(0.001, 0.0));
        assert_relative_eq!(d, 0.111_194_9, epsilon = 1e-4);
    }

    #[test]
    fn test_tokyo_osaka() {
        // Tokyo to Shin-Osaka is roughly 400 km in a straight line
        let tokyo = Point::new(139.7671, 35.6812);
        let osaka = Point::new(135.5003, 34.7334);

        let d = spherical_distance_km(tokyo, osaka);
        assert!((d - 400.0).abs() < 10.0, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = Point::new(135.0, 34.0);
        let b = Point::new(136.0, 35.0);
        assert_relative_eq!(spherical_distance_km(a, b), spherical_distance_km(b, a));
    }

    #[test]
    fn test_segment_centroid_skips_empty() {
        let segments = vec![
            LineString::new(vec![]),
            LineString::from(vec![(1.0, 1.0), (3.0, 3.0)]),
        ];
        let c = segment_centroid(&segments).unwrap();
        assert_relative_eq!(c.x(), 2.0);
        assert_relative_eq!(c.y(), 2.0);

        assert!(segment_centroid(&[LineString::new(vec![])]).is_none());
    }
}
