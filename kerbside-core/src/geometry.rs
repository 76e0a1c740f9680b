//! Even-odd point-in-polygon tests over `geo` rings.
//!
//! Rings are implicitly closed: the edge from the last vertex back to the first
//! is always tested, so the repeated closing vertex `geo` and `GeoJSON` write
//! is harmless. Points exactly on an edge follow the half-open convention of
//! the ray cast: bottom and left edges count as inside, top and right edges do
//! not.

use geo::{LineString, Polygon};

use crate::model::Coordinate;

/// Test the exterior ring of `polygon` only, ignoring holes.
#[must_use]
pub fn contains_exterior(polygon: &Polygon<f64>, point: Coordinate) -> bool {
    point_in_ring(point, polygon.exterior())
}

/// Exact containment: inside the exterior and outside every hole.
#[must_use]
pub fn contains(polygon: &Polygon<f64>, point: Coordinate) -> bool {
    polygon
        .interiors()
        .iter()
        .fold(contains_exterior(polygon, point), |inside, hole| {
            inside ^ point_in_ring(point, hole)
        })
}

/// Ray-casting containment test of `point` against a single ring.
///
/// Rings with fewer than three vertices enclose nothing.
#[must_use]
pub fn point_in_ring(point: Coordinate, ring: &LineString<f64>) -> bool {
    if ring.0.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut previous = ring.coords().last().copied();

    for current in ring.coords() {
        if let Some(prev) = previous
            && (current.y > point.y) != (prev.y > point.y)
        {
            let intercept =
                (prev.x - current.x) * (point.y - current.y) / (prev.y - current.y) + current.x;
            if point.x < intercept {
                inside = !inside;
            }
        }
        previous = Some(*current);
    }

    inside
}
