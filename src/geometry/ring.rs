//! Alley bounding polygon from its resolved corner points.

use geo::{Coord, LineString, Point, Polygon};

use crate::error::LocationError;

/// Drop repeated points, keeping first occurrences in order
pub fn distinct_points(points: impl IntoIterator<Item = Point<f64>>) -> Vec<Point<f64>> {
    let mut distinct: Vec<Point<f64>> = Vec::new();
    for point in points {
        if !distinct.contains(&point) {
            distinct.push(point);
        }
    }
    distinct
}

/// Arithmetic mean of the points
fn mean(points: &[Point<f64>]) -> Option<Coord<f64>> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x(), sy + p.y()));
    Some(Coord { x: sx / n, y: sy / n })
}

/// Order corners by angle around their centroid and close them into a polygon.
///
/// Angles ascend from `-pi`, so the exterior ring runs counter-clockwise
/// (x east, y north), the RFC 7946 winding.
pub fn alley_polygon(
    corners: impl IntoIterator<Item = Point<f64>>,
) -> Result<Polygon<f64>, LocationError> {
    let mut corners = distinct_points(corners);
    let center = match mean(&corners) {
        Some(center) if corners.len() >= 3 => center,
        _ => {
            return Err(LocationError::AlleyUnderConstrained {
                resolved: corners.len(),
            })
        }
    };

    let angle = |p: &Point<f64>| (p.y() - center.y).atan2(p.x() - center.x);
    corners.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

    let ring: Vec<Coord<f64>> = corners.iter().map(|p| p.0).collect();
    // Polygon::new closes the ring
    Ok(Polygon::new(LineString::new(ring), vec![]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Winding};

    #[test]
    fn test_square_is_counter_clockwise() {
        // given clockwise from the top-left
        let corners = vec![
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ];
        let polygon = alley_polygon(corners).unwrap();

        assert!(polygon.exterior().is_ccw());
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.exterior().0.first(), polygon.exterior().0.last());
        assert!(polygon.signed_area() > 0.0);
        assert!((polygon.unsigned_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_duplicates_dropped() {
        let corners = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
            Point::new(2.0, 2.0),
        ];
        let polygon = alley_polygon(corners).unwrap();
        assert_eq!(polygon.exterior().0.len(), 5);
        assert!((polygon.unsigned_area() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle_allowed() {
        let corners = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ];
        let polygon = alley_polygon(corners).unwrap();
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_too_few_corners() {
        let corners = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(0.0, 0.0)];
        assert_eq!(
            alley_polygon(corners),
            Err(LocationError::AlleyUnderConstrained { resolved: 2 })
        );
        assert_eq!(
            alley_polygon(Vec::new()),
            Err(LocationError::AlleyUnderConstrained { resolved: 0 })
        );
    }
}
