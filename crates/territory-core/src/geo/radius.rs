//! Radius search over tenant-scoped account sets.
//!
//! Brute-force O(n log n) is deliberate: candidate sets are bounded in the
//! low thousands per tenant, and the sort dominates.

use crate::models::{DistanceResult, GeoPoint, LocatedAccount};

use super::math::distance_km;

/// Accounts within `radius_km` of `center`, annotated with their distance
/// and sorted ascending. Ties keep input order (stable sort).
///
/// Accounts without a geocoded point are skipped. A non-positive radius
/// yields an empty result, not an error.
pub fn within_radius(
    center: GeoPoint,
    candidates: &[LocatedAccount],
    radius_km: f64,
) -> Vec<DistanceResult<LocatedAccount>> {
    if radius_km <= 0.0 {
        return Vec::new();
    }

    let mut results: Vec<DistanceResult<LocatedAccount>> = candidates
        .iter()
        .filter_map(|account| {
            let point = account.point?;
            let d = distance_km(center, point);
            (d <= radius_km).then(|| DistanceResult { item: account.clone(), distance_km: d })
        })
        .collect();

    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results
}

/// The `k` nearest geocoded accounts to `center`, sorted ascending by
/// distance. Returns fewer than `k` when the candidate set is small.
pub fn nearest(
    center: GeoPoint,
    candidates: &[LocatedAccount],
    k: usize,
) -> Vec<DistanceResult<LocatedAccount>> {
    let mut results: Vec<DistanceResult<LocatedAccount>> = candidates
        .iter()
        .filter_map(|account| {
            let point = account.point?;
            Some(DistanceResult { item: account.clone(), distance_km: distance_km(center, point) })
        })
        .collect();

    results.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    results.truncate(k);
    results
}
