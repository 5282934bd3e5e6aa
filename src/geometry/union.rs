//! Combining per-piece geometries into one location geometry.

use geo::{Geometry, GeometryCollection, MultiPoint, Point};

use super::ring::distinct_points;

/// Union of piece geometries in piece order.
///
/// No pieces gives `None`, a single piece is returned unchanged, all-point
/// input becomes a `MultiPoint` of the distinct points (or a bare `Point` if
/// they coincide), and anything else is a `GeometryCollection`.
pub fn combine(pieces: Vec<Geometry<f64>>) -> Option<Geometry<f64>> {
    if pieces.len() <= 1 {
        return pieces.into_iter().next();
    }

    let points: Option<Vec<Point<f64>>> = pieces
        .iter()
        .map(|piece| match piece {
            Geometry::Point(p) => Some(*p),
            _ => None,
        })
        .collect();

    match points {
        Some(points) => {
            let mut distinct = distinct_points(points);
            if distinct.len() == 1 {
                distinct.pop().map(Geometry::Point)
            } else {
                Some(Geometry::MultiPoint(MultiPoint::new(distinct)))
            }
        }
        None => Some(Geometry::GeometryCollection(GeometryCollection::from(pieces))),
    }
}
