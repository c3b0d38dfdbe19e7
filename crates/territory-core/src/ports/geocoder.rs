use async_trait::async_trait;

use crate::error::Result;
use crate::models::GeoPoint;

/// Port for the external geocoding collaborator.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve a free-form address to coordinates.
    ///
    /// Fails with `GeocodeFailed` when the address cannot be resolved.
    async fn geocode(&self, address: &str) -> Result<GeoPoint>;
}
