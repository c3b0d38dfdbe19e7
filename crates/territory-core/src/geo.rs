//! Geometry algorithms: pure, stateless, and safe to call concurrently.

pub mod cluster;
pub mod contains;
pub mod hull;
pub mod math;
pub mod radius;
pub mod route;

pub use cluster::{cluster, cluster_with_iterations, DEFAULT_MAX_ITERATIONS};
pub use contains::{contains, contains_unchecked};
pub use hull::{convex_hull, suggest_boundary, DEFAULT_BUFFER_KM};
pub use math::{
    area_km2, bounding_box, centroid, distance_km, simplify, EARTH_RADIUS_KM, KM_PER_DEG_LAT,
};
pub use radius::{nearest, within_radius};
pub use route::optimize;
