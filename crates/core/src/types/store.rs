//! Store tenant entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CurrencyCode, Slug, StoreId, StoreStatus};

/// A merchant's store - the tenant every storefront request resolves to.
///
/// Stores are never hard-deleted; they are suspended instead, so a slug
/// stays taken for the lifetime of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTenant {
    pub id: StoreId,
    pub slug: Slug,
    pub name: String,
    pub status: StoreStatus,
    /// Currency the storefront prices in.
    pub currency: CurrencyCode,
    pub created_at: DateTime<Utc>,
}

impl StoreTenant {
    /// Whether customers may be served this store's storefront.
    #[must_use]
    pub const fn is_servable(&self) -> bool {
        self.status.is_servable()
    }
}
