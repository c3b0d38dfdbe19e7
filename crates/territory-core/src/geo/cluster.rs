//! Proximity clustering of account locations.
//!
//! A deterministic k-means variant: centroids are seeded from evenly
//! spaced positions in the input order (not randomly), so repeated runs
//! over the same input produce the same clusters.

use crate::error::{Result, TerritoryError};
use crate::models::{Boundary, ClusterResult, GeoPoint, Waypoint};

use super::hull::{convex_hull, degenerate_polygon};
use super::math::distance_km;

/// Iteration cap for the assignment/recentering loop. Clustering usually
/// converges in a handful of rounds at territory scale.
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Partition `points` into at most `max_clusters` groups by great-circle
/// proximity, emitting one polygon per group.
///
/// `max_clusters == 0` is a contract violation. The output may hold fewer
/// clusters than requested when fewer distinct points exist; an empty
/// input yields an empty result. Groups of 1-2 points produce a minimal
/// epsilon-buffered polygon so every emitted shape is valid GeoJSON.
pub fn cluster(points: &[Waypoint], max_clusters: usize) -> Result<Vec<ClusterResult>> {
    cluster_with_iterations(points, max_clusters, DEFAULT_MAX_ITERATIONS)
}

/// [`cluster`] with an explicit iteration cap.
pub fn cluster_with_iterations(
    points: &[Waypoint],
    max_clusters: usize,
    max_iterations: usize,
) -> Result<Vec<ClusterResult>> {
    if max_clusters == 0 {
        return Err(TerritoryError::invalid_argument(
            "max_clusters must be positive",
        ));
    }
    if points.is_empty() {
        return Ok(Vec::new());
    }

    let distinct = distinct_positions(points);
    let k = max_clusters.min(distinct.len());

    // Seed centroids from evenly spaced distinct positions in input order
    let mut centroids: Vec<GeoPoint> =
        (0..k).map(|i| distinct[i * distinct.len() / k]).collect();

    let mut assignment = vec![0usize; points.len()];
    for _ in 0..max_iterations {
        let next: Vec<usize> =
            points.iter().map(|wp| nearest_centroid(wp.point, &centroids)).collect();
        let converged = next == assignment;
        assignment = next;

        for (ci, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<GeoPoint> = points
                .iter()
                .zip(&assignment)
                .filter(|(_, a)| **a == ci)
                .map(|(wp, _)| wp.point)
                .collect();
            if !members.is_empty() {
                *centroid = mean_point(&members);
            }
        }

        if converged {
            break;
        }
    }

    let mut results = Vec::new();
    for ci in 0..k {
        let members: Vec<&Waypoint> =
            points.iter().zip(&assignment).filter(|(_, a)| **a == ci).map(|(wp, _)| wp).collect();
        if members.is_empty() {
            continue;
        }
        let member_points: Vec<GeoPoint> = members.iter().map(|wp| wp.point).collect();
        let member_ids = members.iter().map(|wp| wp.id).collect();
        results.push(ClusterResult {
            polygon: cluster_polygon(&member_points),
            member_ids,
        });
    }

    tracing::debug!(
        requested = max_clusters,
        produced = results.len(),
        points = points.len(),
        "clustered points"
    );
    Ok(results)
}

fn nearest_centroid(point: GeoPoint, centroids: &[GeoPoint]) -> usize {
    let mut best = 0;
    let mut best_dist = distance_km(point, centroids[0]);
    for (i, c) in centroids.iter().enumerate().skip(1) {
        let d = distance_km(point, *c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn mean_point(points: &[GeoPoint]) -> GeoPoint {
    let n = points.len() as f64;
    GeoPoint {
        latitude: points.iter().map(|p| p.latitude).sum::<f64>() / n,
        longitude: points.iter().map(|p| p.longitude).sum::<f64>() / n,
    }
}

/// Enclosing polygon for a cluster: convex hull for 3+ distinct points,
/// epsilon-buffered box for degenerate groups.
fn cluster_polygon(points: &[GeoPoint]) -> Boundary {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return degenerate_polygon(points);
    }
    let mut ring: Vec<[f64; 2]> = hull.iter().map(|p| p.to_lng_lat()).collect();
    ring.push(ring[0]);
    Boundary::polygon(vec![ring])
}

fn distinct_positions(points: &[Waypoint]) -> Vec<GeoPoint> {
    let mut seen: Vec<[f64; 2]> = Vec::new();
    let mut out = Vec::new();
    for wp in points {
        let pair = wp.point.to_lng_lat();
        if !seen.contains(&pair) {
            seen.push(pair);
            out.push(wp.point);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountId;

    fn wp(lat: f64, lng: f64) -> Waypoint {
        Waypoint::new(AccountId::new(), GeoPoint { latitude: lat, longitude: lng })
    }

    fn three_pairs() -> Vec<Waypoint> {
        vec![
            wp(38.9, -77.0),
            wp(38.91, -77.01),
            wp(38.8, -77.1),
            wp(38.81, -77.11),
            wp(40.7, -74.0),
            wp(40.71, -74.01),
        ]
    }

    #[test]
    fn test_zero_clusters_is_contract_violation() {
        let err = cluster(&three_pairs(), 0).unwrap_err();
        assert!(matches!(err, TerritoryError::InvalidArgument { .. }));
    }

    #[test]
    fn test_empty_input_yields_no_clusters() {
        assert!(cluster(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_three_obvious_pairs() {
        let clusters = cluster(&three_pairs(), 3).unwrap();
        assert!(clusters.len() <= 3);
        assert!(!clusters.is_empty());

        let total_members: usize = clusters.iter().map(|c| c.member_ids.len()).sum();
        assert_eq!(total_members, 6);
        for c in &clusters {
            assert!(c.polygon.is_valid());
        }
    }

    #[test]
    fn test_fewer_distinct_points_than_requested() {
        let points = vec![wp(38.9, -77.0), wp(38.9, -77.0), wp(38.8, -77.1)];
        let clusters = cluster(&points, 5).unwrap();
        assert!(clusters.len() <= 2);
        let total_members: usize = clusters.iter().map(|c| c.member_ids.len()).sum();
        assert_eq!(total_members, 3);
    }

    #[test]
    fn test_single_point_cluster_polygon_is_valid() {
        let clusters = cluster(&[wp(38.85, -77.05)], 3).unwrap();
        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].polygon.is_valid());
        assert_eq!(clusters[0].member_ids.len(), 1);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let points = three_pairs();
        let a = cluster(&points, 3).unwrap();
        let b = cluster(&points, 3).unwrap();
        assert_eq!(a.len(), b.len());
        for (ca, cb) in a.iter().zip(&b) {
            assert_eq!(ca.member_ids, cb.member_ids);
            assert_eq!(ca.polygon, cb.polygon);
        }
    }
}
