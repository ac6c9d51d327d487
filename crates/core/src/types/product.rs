//! Product entity (the storefront catalog projection).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Price, ProductId, ProductStatus, StoreId};

/// A product as shown on a storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub store_id: StoreId,
    /// URL handle, unique within the store.
    pub handle: String,
    pub title: String,
    pub price: Price,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
}
