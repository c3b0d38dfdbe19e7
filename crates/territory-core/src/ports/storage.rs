use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AccountId, Boundary, BoundingBox, LocatedAccount, RepId, TenantId, Territory, TerritoryId,
};

/// Port for the territory/account persistence collaborator.
///
/// The engine never mutates records directly; every read and write goes
/// through this trait. Transaction boundaries are owned by the adapter's
/// caller (see the engine docs on read/write atomicity).
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Accounts inside a bounding box, excluding accounts without
    /// coordinates. Used as a cheap pre-filter before point-in-polygon
    /// work.
    async fn find_accounts_in_bounds(
        &self,
        tenant_id: TenantId,
        bbox: &BoundingBox,
    ) -> Result<Vec<LocatedAccount>>;

    /// All of a tenant's accounts that have been geocoded.
    async fn find_all_accounts_with_coordinates(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<LocatedAccount>>;

    /// Look up a territory by id.
    async fn get_territory(&self, id: TerritoryId) -> Result<Option<Territory>>;

    /// Assign the given accounts to a representative. Returns the number
    /// of records updated.
    async fn bulk_set_owner(&self, account_ids: &[AccountId], owner_id: RepId) -> Result<usize>;

    /// Replace a territory's boundary, returning the updated record.
    async fn update_territory_boundary(
        &self,
        id: TerritoryId,
        boundary: Boundary,
    ) -> Result<Territory>;
}
