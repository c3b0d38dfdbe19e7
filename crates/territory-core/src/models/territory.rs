//! Persisted record types owned by the store collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::geometry::{Boundary, GeoPoint};

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a territory
    TerritoryId
);
uuid_id!(
    /// Unique identifier for a tenant (organization)
    TenantId
);
uuid_id!(
    /// Unique identifier for a field sales representative
    RepId
);
uuid_id!(
    /// Unique identifier for a customer account
    AccountId
);

/// A named geographic sales region.
///
/// A territory may exist without a boundary (`boundary: None`) until one is
/// drawn manually or synthesized from the owner's existing accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Territory {
    /// Unique identifier
    pub id: TerritoryId,

    /// Owning tenant
    pub tenant_id: TenantId,

    /// Display name
    pub name: String,

    /// Representative this territory is assigned to, if any
    pub owner_id: Option<RepId>,

    /// Boundary shape; `None` means the territory has no shape yet
    pub boundary: Option<Boundary>,

    /// Display color (hex string, e.g. "#FF0000")
    pub color: String,

    /// When the territory was created
    pub created_at: DateTime<Utc>,

    /// When the territory was last modified
    pub updated_at: DateTime<Utc>,
}

impl Territory {
    /// Create an unbounded territory.
    pub fn new(tenant_id: TenantId, name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: TerritoryId::new(),
            tenant_id,
            name: name.into(),
            owner_id: None,
            boundary: None,
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A customer account as seen by the geometry layer.
///
/// `point: None` means the account has not been geocoded yet; such accounts
/// are excluded from every geometry operation rather than treated as (0,0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatedAccount {
    /// Unique identifier
    pub id: AccountId,

    /// Business name
    pub name: String,

    /// Geocoded location, if known
    pub point: Option<GeoPoint>,
}

impl LocatedAccount {
    pub fn new(name: impl Into<String>, point: Option<GeoPoint>) -> Self {
        Self { id: AccountId::new(), name: name.into(), point }
    }
}
