//! Even-odd ray-casting point-in-polygon tests with hole support.

use crate::error::Result;
use crate::models::{Boundary, GeoPoint, Ring};

use super::math::ring_without_closing_vertex;

/// Test whether a point falls inside a boundary.
///
/// The point is tested against each member polygon's outer ring; if inside
/// the outer ring it is then tested against that polygon's holes, and being
/// inside any hole excludes it. A `MultiPolygon` contains the point if any
/// member polygon does.
///
/// Points exactly on an edge may resolve either way due to floating-point
/// ray casting; callers must not rely on a specific boundary-edge outcome.
///
/// Fails with `InvalidGeometry` if the boundary is structurally invalid;
/// bulk callers should validate once up front and use
/// [`contains_unchecked`] per point.
pub fn contains(point: GeoPoint, boundary: &Boundary) -> Result<bool> {
    boundary.ensure_valid()?;
    Ok(contains_unchecked(point, boundary))
}

/// [`contains`] without the structural validation pass. The boundary must
/// already have been checked with [`Boundary::ensure_valid`].
pub fn contains_unchecked(point: GeoPoint, boundary: &Boundary) -> bool {
    boundary.polygons().iter().any(|rings| polygon_contains(point, rings))
}

fn polygon_contains(point: GeoPoint, rings: &[Ring]) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    if !point_in_ring(point, outer) {
        return false;
    }
    // Inside the outer ring: any hole that contains the point excludes it
    !rings[1..].iter().any(|hole| point_in_ring(point, hole))
}

/// Standard even-odd ray cast: count crossings of a horizontal ray from
/// the point toward +longitude.
fn point_in_ring(point: GeoPoint, ring: &Ring) -> bool {
    let pts = ring_without_closing_vertex(ring);
    if pts.len() < 3 {
        return false;
    }

    let (px, py) = (point.longitude, point.latitude);
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (xi, yi) = (pts[i][0], pts[i][1]);
        let (xj, yj) = (pts[j][0], pts[j][1]);

        let crosses = (yi > py) != (yj > py)
            && px < (xj - xi) * (py - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}
