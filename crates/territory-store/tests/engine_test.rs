//! Integration tests for the assignment engine over the in-memory store.

use std::sync::Arc;

use territory_core::error::TerritoryError;
use territory_core::geo::suggest_boundary;
use territory_core::models::{
    Boundary, BoundingBox, GeoPoint, LocatedAccount, RepId, TenantId, Territory, TerritoryId,
};
use territory_core::ports::AccountStore;
use territory_core::TerritoryAssignmentEngine;
use territory_store::MemoryStore;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dc_square() -> Boundary {
    Boundary::polygon(vec![vec![
        [-77.1, 38.8],
        [-77.0, 38.8],
        [-77.0, 38.9],
        [-77.1, 38.9],
        [-77.1, 38.8],
    ]])
}

fn point(lat: f64, lng: f64) -> Option<GeoPoint> {
    Some(GeoPoint { latitude: lat, longitude: lng })
}

struct Fixture {
    store: Arc<MemoryStore>,
    engine: TerritoryAssignmentEngine<MemoryStore>,
    tenant_id: TenantId,
    territory: Territory,
    inside: LocatedAccount,
    outside: LocatedAccount,
}

async fn fixture(owner: Option<RepId>) -> Fixture {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let tenant_id = TenantId::new();

    let mut territory = Territory::new(tenant_id, "DC Metro", "#FF0000");
    territory.owner_id = owner;
    store.insert_territory(territory.clone()).await;

    let inside = LocatedAccount::new("White House Deli", point(38.85, -77.05));
    let outside = LocatedAccount::new("Baltimore Bakery", point(39.29, -76.61));
    let unlocated = LocatedAccount::new("New Lead", None);
    store.insert_account(tenant_id, inside.clone()).await;
    store.insert_account(tenant_id, outside.clone()).await;
    store.insert_account(tenant_id, unlocated).await;

    // Another tenant's account at the same coordinates must never leak in
    let other_tenant = TenantId::new();
    store
        .insert_account(other_tenant, LocatedAccount::new("Other Org", point(38.85, -77.05)))
        .await;

    let engine = TerritoryAssignmentEngine::new(store.clone());
    Fixture { store, engine, tenant_id, territory, inside, outside }
}

#[tokio::test]
async fn customers_in_bounds_uses_store_prefilter() {
    let f = fixture(None).await;
    let bbox = BoundingBox { min_lat: 38.8, max_lat: 38.9, min_lng: -77.1, max_lng: -77.0 };
    let found = f.engine.customers_in_bounds(f.tenant_id, &bbox).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, f.inside.id);
}

#[tokio::test]
async fn customers_in_unbounded_territory_is_empty() {
    let f = fixture(None).await;
    let found = f.engine.customers_in_territory(f.territory.id).await.unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn customers_in_territory_filters_by_boundary() {
    let f = fixture(None).await;
    f.store
        .update_territory_boundary(f.territory.id, dc_square())
        .await
        .unwrap();

    let found = f.engine.customers_in_territory(f.territory.id).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, f.inside.id);
}

#[tokio::test]
async fn unknown_territory_is_not_found() {
    let f = fixture(None).await;
    let err = f
        .engine
        .customers_in_territory(TerritoryId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TerritoryError::TerritoryNotFound { .. }));
}

#[tokio::test]
async fn assignment_without_owner_is_a_dry_run() {
    let f = fixture(None).await;
    let count = f
        .engine
        .assign_customers_to_territory(f.territory.id, &dc_square())
        .await
        .unwrap();
    assert_eq!(count, 1);

    // Nothing was written: no boundary, no owner change
    let stored = f.store.get_territory(f.territory.id).await.unwrap().unwrap();
    assert!(stored.boundary.is_none());
    assert_eq!(f.store.account_owner(f.inside.id).await, None);
}

#[tokio::test]
async fn assignment_with_owner_applies_and_is_idempotent() {
    let rep = RepId::new();
    let f = fixture(Some(rep)).await;

    let first = f
        .engine
        .assign_customers_to_territory(f.territory.id, &dc_square())
        .await
        .unwrap();
    assert_eq!(first, 1);
    assert_eq!(f.store.account_owner(f.inside.id).await, Some(rep));
    assert_eq!(f.store.account_owner(f.outside.id).await, None);

    let stored = f.store.get_territory(f.territory.id).await.unwrap().unwrap();
    assert_eq!(stored.boundary, Some(dc_square()));

    // Re-running with the same boundary matches the same accounts again
    let second = f
        .engine
        .assign_customers_to_territory(f.territory.id, &dc_square())
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(f.store.account_owner(f.inside.id).await, Some(rep));
}

#[tokio::test]
async fn assignment_rejects_invalid_boundary() {
    let f = fixture(Some(RepId::new())).await;
    let unclosed = Boundary::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
    let err = f
        .engine
        .assign_customers_to_territory(f.territory.id, &unclosed)
        .await
        .unwrap_err();
    assert!(matches!(err, TerritoryError::InvalidGeometry { .. }));

    // A failed validation writes nothing
    let stored = f.store.get_territory(f.territory.id).await.unwrap().unwrap();
    assert!(stored.boundary.is_none());
}

#[tokio::test]
async fn synthesized_boundary_feeds_assignment() {
    let rep = RepId::new();
    let f = fixture(Some(rep)).await;

    // Synthesize a territory from points around the inside account
    let seeds = vec![
        GeoPoint { latitude: 38.82, longitude: -77.08 },
        GeoPoint { latitude: 38.82, longitude: -77.02 },
        GeoPoint { latitude: 38.88, longitude: -77.02 },
        GeoPoint { latitude: 38.88, longitude: -77.08 },
    ];
    let boundary = suggest_boundary(&seeds, 5.0).expect("enough points for a hull");

    let count = f
        .engine
        .assign_customers_to_territory(f.territory.id, &boundary)
        .await
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(f.store.account_owner(f.inside.id).await, Some(rep));
}
