//! Convex hull and territory boundary synthesis.
//!
//! Hull computation treats lng/lat as planar coordinates, which is
//! acceptable at territory scale (tens of kilometers).

use crate::models::{Boundary, BoundingBox, GeoPoint, Ring};

use super::math::{km_per_deg_lng, KM_PER_DEG_LAT};

/// Default safety margin applied around a synthesized boundary.
pub const DEFAULT_BUFFER_KM: f64 = 5.0;

/// Padding in degrees used to inflate degenerate (point or line) shapes
/// into structurally valid polygons. Roughly 11 meters.
pub const DEGENERATE_EPSILON_DEG: f64 = 1e-4;

/// Derive a territory boundary from a rep's existing account locations:
/// convex hull of the point set, expanded outward by `buffer_km`.
///
/// Returns `None` when fewer than 3 distinct points exist. That is the
/// normal "not enough data yet" outcome for a new rep, not a failure.
///
/// If all points are collinear the unbuffered hull is returned as a thin
/// line-polygon rather than failing.
pub fn suggest_boundary(points: &[GeoPoint], buffer_km: f64) -> Option<Boundary> {
    let distinct = distinct_points(points);
    if distinct.len() < 3 {
        return None;
    }

    let hull = convex_hull(&distinct);
    if hull.len() < 3 {
        // Collinear input: monotone chain collapses to the two endpoints
        return Some(line_polygon(&distinct));
    }

    let ring = close_ring(buffer_ring(&hull, buffer_km));
    Some(Boundary::polygon(vec![ring]))
}

/// Andrew's monotone chain. Returns hull vertices in counter-clockwise
/// order without a closing duplicate; collinear inputs collapse to the two
/// extreme endpoints.
pub fn convex_hull(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut pts: Vec<[f64; 2]> = points.iter().map(|p| p.to_lng_lat()).collect();
    pts.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    pts.dedup();

    if pts.len() < 3 {
        return pts.into_iter().map(GeoPoint::from_lng_lat).collect();
    }

    let mut lower: Vec<[f64; 2]> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<[f64; 2]> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower.into_iter().map(GeoPoint::from_lng_lat).collect()
}

/// Inflate a degenerate point set (one point, or several collinear or
/// coincident points) into a minimal structurally valid polygon by padding
/// its bounding box by [`DEGENERATE_EPSILON_DEG`].
pub fn degenerate_polygon(points: &[GeoPoint]) -> Boundary {
    let bbox = BoundingBox::from_points(points)
        .map(|b| b.padded(DEGENERATE_EPSILON_DEG))
        .unwrap_or(BoundingBox {
            min_lat: -DEGENERATE_EPSILON_DEG,
            max_lat: DEGENERATE_EPSILON_DEG,
            min_lng: -DEGENERATE_EPSILON_DEG,
            max_lng: DEGENERATE_EPSILON_DEG,
        });
    Boundary::polygon(vec![vec![
        [bbox.min_lng, bbox.min_lat],
        [bbox.max_lng, bbox.min_lat],
        [bbox.max_lng, bbox.max_lat],
        [bbox.min_lng, bbox.max_lat],
        [bbox.min_lng, bbox.min_lat],
    ]])
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Push every hull vertex radially away from the hull's vertex-average
/// center by `buffer_km`, converted to degrees at the hull's mean
/// latitude.
fn buffer_ring(hull: &[GeoPoint], buffer_km: f64) -> Vec<[f64; 2]> {
    if buffer_km <= 0.0 {
        return hull.iter().map(|p| p.to_lng_lat()).collect();
    }

    let n = hull.len() as f64;
    let center_lat = hull.iter().map(|p| p.latitude).sum::<f64>() / n;
    let center_lng = hull.iter().map(|p| p.longitude).sum::<f64>() / n;

    let ky = KM_PER_DEG_LAT;
    let kx = km_per_deg_lng(center_lat);

    hull.iter()
        .map(|p| {
            let dx = (p.longitude - center_lng) * kx;
            let dy = (p.latitude - center_lat) * ky;
            let len = (dx * dx + dy * dy).sqrt();
            if len == 0.0 {
                return p.to_lng_lat();
            }
            let scale = (len + buffer_km) / len;
            [
                center_lng + dx * scale / kx,
                center_lat + dy * scale / ky,
            ]
        })
        .collect()
}

fn close_ring(mut ring: Ring) -> Ring {
    if ring.first() != ring.last() {
        if let Some(&first) = ring.first() {
            ring.push(first);
        }
    }
    ring
}

/// Zero-area polygon tracing collinear points out and back.
fn line_polygon(points: &[GeoPoint]) -> Boundary {
    let mut sorted: Vec<[f64; 2]> = points.iter().map(|p| p.to_lng_lat()).collect();
    sorted.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));

    let mut ring: Ring = sorted.clone();
    ring.extend(sorted.iter().rev().skip(1));
    Boundary::polygon(vec![ring])
}

fn distinct_points(points: &[GeoPoint]) -> Vec<GeoPoint> {
    let mut seen: Vec<[f64; 2]> = Vec::new();
    let mut out = Vec::new();
    for p in points {
        let pair = p.to_lng_lat();
        if !seen.contains(&pair) {
            seen.push(pair);
            out.push(*p);
        }
    }
    out
}
