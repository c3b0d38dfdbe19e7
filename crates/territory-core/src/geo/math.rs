//! Pure numeric primitives: great-circle distance, bounding boxes,
//! centroids, polygon simplification, and area.
//!
//! Everything here is stateless and safe to call concurrently. A spherical
//! earth (radius 6371 km) is assumed throughout; that is accurate to well
//! under 1% at territory scale.

use crate::error::{Result, TerritoryError};
use crate::models::{Boundary, BoundingBox, GeoPoint, Ring};

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude (and of longitude at the equator).
pub const KM_PER_DEG_LAT: f64 = 111.32;

/// Haversine great-circle distance between two points, in kilometers.
///
/// Symmetric, and exactly 0 for identical inputs.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Kilometers per degree of longitude at the given latitude.
pub fn km_per_deg_lng(latitude: f64) -> f64 {
    KM_PER_DEG_LAT * latitude.to_radians().cos()
}

/// Min/max extent over every ring vertex of the boundary, holes included.
///
/// Fails with `InvalidGeometry` if the boundary has no rings or no
/// vertices.
pub fn bounding_box(boundary: &Boundary) -> Result<BoundingBox> {
    let points: Vec<GeoPoint> = boundary
        .polygons()
        .iter()
        .flat_map(|rings| rings.iter())
        .flat_map(|ring| ring.iter())
        .map(|pair| GeoPoint::from_lng_lat(*pair))
        .collect();

    BoundingBox::from_points(&points)
        .ok_or_else(|| TerritoryError::invalid_geometry("boundary has no ring vertices"))
}

/// Vertex-average centroid of the boundary's outer ring(s), excluding each
/// ring's duplicated closing vertex.
///
/// This is not an area-weighted centroid; it is only guaranteed to be a
/// representative point near the shape's interior.
pub fn centroid(boundary: &Boundary) -> Result<GeoPoint> {
    let mut sum_lat = 0.0;
    let mut sum_lng = 0.0;
    let mut count = 0usize;

    for rings in boundary.polygons() {
        let outer = rings
            .first()
            .ok_or_else(|| TerritoryError::invalid_geometry("polygon has no outer ring"))?;
        let distinct = ring_without_closing_vertex(outer);
        for pair in distinct {
            sum_lng += pair[0];
            sum_lat += pair[1];
            count += 1;
        }
    }

    if count == 0 {
        return Err(TerritoryError::invalid_geometry("boundary has no ring vertices"));
    }
    Ok(GeoPoint {
        latitude: sum_lat / count as f64,
        longitude: sum_lng / count as f64,
    })
}

/// Planar shoelace area of the boundary in square kilometers, evaluated at
/// each outer ring's mean latitude. Hole areas are subtracted. Degenerate
/// rings contribute 0.
pub fn area_km2(boundary: &Boundary) -> f64 {
    let mut total = 0.0;
    for rings in boundary.polygons() {
        for (i, ring) in rings.iter().enumerate() {
            let ring_area = ring_area_km2(ring);
            if i == 0 {
                total += ring_area;
            } else {
                total -= ring_area;
            }
        }
    }
    total.max(0.0)
}

fn ring_area_km2(ring: &Ring) -> f64 {
    let pts = ring_without_closing_vertex(ring);
    if pts.len() < 3 {
        return 0.0;
    }
    let mean_lat = pts.iter().map(|p| p[1]).sum::<f64>() / pts.len() as f64;
    let kx = km_per_deg_lng(mean_lat);
    let ky = KM_PER_DEG_LAT;

    let mut acc = 0.0;
    for i in 0..pts.len() {
        let a = pts[i];
        let b = pts[(i + 1) % pts.len()];
        acc += (a[0] * kx) * (b[1] * ky) - (b[0] * kx) * (a[1] * ky);
    }
    (acc / 2.0).abs()
}

/// Simplify every ring of the boundary with Douglas-Peucker, dropping
/// vertices whose perpendicular deviation from the simplified chord is
/// below `tolerance_km`.
///
/// Each ring keeps its first and last point (so closure is preserved) and
/// is never reduced below 4 points. A non-positive tolerance is a no-op.
pub fn simplify(boundary: &Boundary, tolerance_km: f64) -> Boundary {
    if tolerance_km <= 0.0 {
        return boundary.clone();
    }
    match boundary {
        Boundary::Polygon { coordinates } => Boundary::Polygon {
            coordinates: coordinates.iter().map(|r| simplify_ring(r, tolerance_km)).collect(),
        },
        Boundary::MultiPolygon { coordinates } => Boundary::MultiPolygon {
            coordinates: coordinates
                .iter()
                .map(|rings| rings.iter().map(|r| simplify_ring(r, tolerance_km)).collect())
                .collect(),
        },
    }
}

fn simplify_ring(ring: &Ring, tolerance_km: f64) -> Ring {
    if ring.len() <= 4 {
        return ring.clone();
    }
    let simplified = douglas_peucker(ring, tolerance_km);
    if simplified.len() < 4 {
        return ring.clone();
    }
    simplified
}

fn douglas_peucker(points: &[[f64; 2]], tolerance_km: f64) -> Vec<[f64; 2]> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    let mut max_dist = 0.0;
    let mut max_idx = 0;
    for (i, p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = perpendicular_distance_km(*p, first, last);
        if d > max_dist {
            max_dist = d;
            max_idx = i;
        }
    }

    if max_dist > tolerance_km {
        let mut left = douglas_peucker(&points[..=max_idx], tolerance_km);
        let right = douglas_peucker(&points[max_idx..], tolerance_km);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Perpendicular distance from `p` to the segment `a`-`b`, in kilometers,
/// using a local planar projection at the segment's mean latitude.
fn perpendicular_distance_km(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let mean_lat = (a[1] + b[1]) / 2.0;
    let kx = km_per_deg_lng(mean_lat);
    let ky = KM_PER_DEG_LAT;

    let (px, py) = ((p[0] - a[0]) * kx, (p[1] - a[1]) * ky);
    let (bx, by) = ((b[0] - a[0]) * kx, (b[1] - a[1]) * ky);

    let len_sq = bx * bx + by * by;
    if len_sq == 0.0 {
        return (px * px + py * py).sqrt();
    }
    let t = ((px * bx + py * by) / len_sq).clamp(0.0, 1.0);
    let (dx, dy) = (px - t * bx, py - t * by);
    (dx * dx + dy * dy).sqrt()
}

/// A ring's vertices with the duplicated closing vertex dropped, if
/// present.
pub(crate) fn ring_without_closing_vertex(ring: &Ring) -> &[[f64; 2]] {
    if ring.len() > 1 && ring.first() == ring.last() {
        &ring[..ring.len() - 1]
    } else {
        ring
    }
}
