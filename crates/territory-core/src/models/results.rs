//! Transient computation outputs. Never persisted.

use serde::{Deserialize, Serialize};

use super::geometry::{Boundary, GeoPoint};
use super::territory::AccountId;

/// An item annotated with its great-circle distance from a query center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceResult<T> {
    pub item: T,
    pub distance_km: f64,
}

/// A labeled point fed to the route optimizer and the clusterer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: AccountId,
    pub point: GeoPoint,
}

impl Waypoint {
    pub fn new(id: AccountId, point: GeoPoint) -> Self {
        Self { id, point }
    }
}

/// A visit sequence produced by the route optimizer.
///
/// `total_distance_km` accumulates the legs from the start point through
/// every stop in order; it does not include a return leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePlan {
    pub order: Vec<Waypoint>,
    pub total_distance_km: f64,
}

/// One spatial cluster: the polygon enclosing its members, tagged with the
/// member ids that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterResult {
    pub polygon: Boundary,
    pub member_ids: Vec<AccountId>,
}
