//! Territory assignment orchestration over the store collaborator.

use std::sync::Arc;

use crate::error::{Result, TerritoryError};
use crate::geo::contains::contains_unchecked;
use crate::models::{Boundary, BoundingBox, LocatedAccount, TenantId, Territory, TerritoryId};
use crate::ports::AccountStore;

/// Orchestrates point-in-polygon matching against a tenant's accounts and
/// applies the results back through the store.
///
/// The engine itself is stateless beyond its store handle. Concurrent
/// calls against different territories are independent; callers must
/// serialize concurrent calls against the *same* territory (e.g. with a
/// per-territory advisory lock) and wrap the read+write of
/// [`assign_customers_to_territory`](Self::assign_customers_to_territory)
/// in one transaction to avoid lost updates.
pub struct TerritoryAssignmentEngine<S> {
    store: Arc<S>,
}

impl<S: AccountStore> TerritoryAssignmentEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Accounts inside a bounding box, straight from the store's cheap
    /// pre-filter. Ungeocoded accounts are excluded at the store layer.
    pub async fn customers_in_bounds(
        &self,
        tenant_id: TenantId,
        bbox: &BoundingBox,
    ) -> Result<Vec<LocatedAccount>> {
        self.store.find_accounts_in_bounds(tenant_id, bbox).await
    }

    /// Accounts whose coordinates fall inside the territory's boundary.
    ///
    /// A territory without a boundary yields an empty list; that is the
    /// normal "no shape drawn yet" state, not an error.
    pub async fn customers_in_territory(
        &self,
        territory_id: TerritoryId,
    ) -> Result<Vec<LocatedAccount>> {
        let territory = self.load_territory(territory_id).await?;

        let Some(boundary) = &territory.boundary else {
            tracing::debug!(territory_id = %territory_id, "territory has no boundary yet");
            return Ok(Vec::new());
        };
        boundary.ensure_valid()?;

        let accounts = self
            .store
            .find_all_accounts_with_coordinates(territory.tenant_id)
            .await?;
        Ok(filter_contained(accounts, boundary))
    }

    /// Match the tenant's accounts against `boundary` and, when the
    /// territory has an owning representative, persist the boundary and
    /// reassign the matched accounts to that rep.
    ///
    /// Without an owner this is a read-only preview: the matched count is
    /// returned and nothing is written. Re-running with the same boundary
    /// and owner is idempotent.
    pub async fn assign_customers_to_territory(
        &self,
        territory_id: TerritoryId,
        boundary: &Boundary,
    ) -> Result<usize> {
        boundary.ensure_valid()?;
        let territory = self.load_territory(territory_id).await?;

        let accounts = self
            .store
            .find_all_accounts_with_coordinates(territory.tenant_id)
            .await?;
        let matched = filter_contained(accounts, boundary);

        let Some(owner_id) = territory.owner_id else {
            tracing::info!(
                territory_id = %territory_id,
                matched = matched.len(),
                "assignment preview (territory has no owner, nothing written)"
            );
            return Ok(matched.len());
        };

        self.store
            .update_territory_boundary(territory_id, boundary.clone())
            .await?;
        let ids: Vec<_> = matched.iter().map(|a| a.id).collect();
        let updated = self.store.bulk_set_owner(&ids, owner_id).await?;

        tracing::info!(
            territory_id = %territory_id,
            owner_id = %owner_id,
            updated,
            "assigned customers to territory"
        );
        Ok(updated)
    }

    async fn load_territory(&self, id: TerritoryId) -> Result<Territory> {
        self.store
            .get_territory(id)
            .await?
            .ok_or(TerritoryError::TerritoryNotFound { id })
    }
}

/// Keep the accounts whose point lies inside `boundary`. The boundary must
/// already be validated; accounts without coordinates are skipped.
fn filter_contained(accounts: Vec<LocatedAccount>, boundary: &Boundary) -> Vec<LocatedAccount> {
    accounts
        .into_iter()
        .filter(|account| {
            account
                .point
                .is_some_and(|p| contains_unchecked(p, boundary))
        })
        .collect()
}
