//! Greedy nearest-neighbor visit ordering.
//!
//! This is a heuristic for day-planning field visits, not an optimal TSP
//! solver; straight-line great-circle legs stand in for road distance.

use crate::models::{GeoPoint, RoutePlan, Waypoint};

use super::math::distance_km;

/// Order `destinations` into a visit sequence from `start`.
///
/// Repeatedly picks the unvisited destination closest to the current
/// position, ties broken by input order, accumulating each leg into
/// `total_distance_km`. The return leg back to `start` is not included.
pub fn optimize(start: GeoPoint, destinations: Vec<Waypoint>) -> RoutePlan {
    let mut remaining = destinations;
    let mut order = Vec::with_capacity(remaining.len());
    let mut current = start;
    let mut total = 0.0;

    while !remaining.is_empty() {
        let mut best_idx = 0;
        let mut best_dist = distance_km(current, remaining[0].point);
        for (i, wp) in remaining.iter().enumerate().skip(1) {
            let d = distance_km(current, wp.point);
            if d < best_dist {
                best_dist = d;
                best_idx = i;
            }
        }

        let next = remaining.remove(best_idx);
        total += best_dist;
        current = next.point;
        order.push(next);
    }

    RoutePlan { order, total_distance_km: total }
}
