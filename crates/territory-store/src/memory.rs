//! In-memory implementation of the `AccountStore` port.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use territory_core::error::{Result, TerritoryError};
use territory_core::models::{
    AccountId, Boundary, BoundingBox, LocatedAccount, RepId, TenantId, Territory, TerritoryId,
};
use territory_core::ports::AccountStore;

#[derive(Debug, Clone)]
struct AccountRecord {
    account: LocatedAccount,
    tenant_id: TenantId,
    owner_id: Option<RepId>,
}

#[derive(Default)]
struct Inner {
    territories: HashMap<TerritoryId, Territory>,
    accounts: HashMap<AccountId, AccountRecord>,
    // Preserves insertion order for deterministic listings
    account_order: Vec<AccountId>,
}

/// Thread-safe in-memory store. Every operation takes a single lock, so
/// individual operations are atomic; multi-operation transactions are the
/// caller's concern, as with any adapter.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a territory record.
    pub async fn insert_territory(&self, territory: Territory) {
        self.inner
            .write()
            .await
            .territories
            .insert(territory.id, territory);
    }

    /// Seed an account record for a tenant.
    pub async fn insert_account(&self, tenant_id: TenantId, account: LocatedAccount) {
        let mut inner = self.inner.write().await;
        inner.account_order.push(account.id);
        inner.accounts.insert(
            account.id,
            AccountRecord { account, tenant_id, owner_id: None },
        );
    }

    /// Current owner of an account, for assertions in tests.
    pub async fn account_owner(&self, id: AccountId) -> Option<RepId> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .and_then(|r| r.owner_id)
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_accounts_in_bounds(
        &self,
        tenant_id: TenantId,
        bbox: &BoundingBox,
    ) -> Result<Vec<LocatedAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .account_order
            .iter()
            .filter_map(|id| inner.accounts.get(id))
            .filter(|r| r.tenant_id == tenant_id)
            .filter(|r| r.account.point.is_some_and(|p| bbox.contains(&p)))
            .map(|r| r.account.clone())
            .collect())
    }

    async fn find_all_accounts_with_coordinates(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<LocatedAccount>> {
        let inner = self.inner.read().await;
        Ok(inner
            .account_order
            .iter()
            .filter_map(|id| inner.accounts.get(id))
            .filter(|r| r.tenant_id == tenant_id && r.account.point.is_some())
            .map(|r| r.account.clone())
            .collect())
    }

    async fn get_territory(&self, id: TerritoryId) -> Result<Option<Territory>> {
        Ok(self.inner.read().await.territories.get(&id).cloned())
    }

    async fn bulk_set_owner(&self, account_ids: &[AccountId], owner_id: RepId) -> Result<usize> {
        let mut inner = self.inner.write().await;
        let mut updated = 0;
        for id in account_ids {
            if let Some(record) = inner.accounts.get_mut(id) {
                record.owner_id = Some(owner_id);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn update_territory_boundary(
        &self,
        id: TerritoryId,
        boundary: Boundary,
    ) -> Result<Territory> {
        let mut inner = self.inner.write().await;
        let territory = inner
            .territories
            .get_mut(&id)
            .ok_or(TerritoryError::TerritoryNotFound { id })?;
        territory.boundary = Some(boundary);
        territory.updated_at = Utc::now();
        Ok(territory.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use territory_core::models::GeoPoint;

    fn point(lat: f64, lng: f64) -> Option<GeoPoint> {
        Some(GeoPoint { latitude: lat, longitude: lng })
    }

    #[tokio::test]
    async fn test_bounds_query_scopes_by_tenant() {
        let store = MemoryStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        store
            .insert_account(tenant_a, LocatedAccount::new("A", point(38.85, -77.05)))
            .await;
        store
            .insert_account(tenant_b, LocatedAccount::new("B", point(38.85, -77.05)))
            .await;

        let bbox = BoundingBox { min_lat: 38.8, max_lat: 38.9, min_lng: -77.1, max_lng: -77.0 };
        let found = store.find_accounts_in_bounds(tenant_a, &bbox).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "A");
    }

    #[tokio::test]
    async fn test_ungeocoded_accounts_excluded() {
        let store = MemoryStore::new();
        let tenant = TenantId::new();
        store
            .insert_account(tenant, LocatedAccount::new("Located", point(38.85, -77.05)))
            .await;
        store
            .insert_account(tenant, LocatedAccount::new("Unlocated", None))
            .await;

        let all = store
            .find_all_accounts_with_coordinates(tenant)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Located");
    }

    #[tokio::test]
    async fn test_bulk_set_owner_counts_known_accounts() {
        let store = MemoryStore::new();
        let tenant = TenantId::new();
        let account = LocatedAccount::new("A", point(38.85, -77.05));
        let id = account.id;
        store.insert_account(tenant, account).await;

        let rep = RepId::new();
        let updated = store.bulk_set_owner(&[id, AccountId::new()], rep).await.unwrap();
        assert_eq!(updated, 1);
        assert_eq!(store.account_owner(id).await, Some(rep));
    }

    #[tokio::test]
    async fn test_update_boundary_on_missing_territory() {
        let store = MemoryStore::new();
        let boundary = Boundary::polygon(vec![vec![
            [-77.1, 38.8],
            [-77.0, 38.8],
            [-77.0, 38.9],
            [-77.1, 38.9],
            [-77.1, 38.8],
        ]]);
        let err = store
            .update_territory_boundary(TerritoryId::new(), boundary)
            .await
            .unwrap_err();
        assert!(matches!(err, TerritoryError::TerritoryNotFound { .. }));
    }
}
