pub mod geometry;
pub mod results;
pub mod territory;

pub use geometry::{Boundary, BoundingBox, DistanceUnit, GeoPoint, Ring};
pub use results::{ClusterResult, DistanceResult, RoutePlan, Waypoint};
pub use territory::{AccountId, LocatedAccount, RepId, TenantId, Territory, TerritoryId};
