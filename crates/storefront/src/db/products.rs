//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use simpshopy_core::{Price, Product, ProductId, StoreId};

use super::{RepositoryError, keep_valid};

/// Raw `simpshopy.products` row before validation.
#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub store_id: Uuid,
    pub handle: String,
    pub title: String,
    pub price_amount: Decimal,
    pub price_currency: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("product {id}: invalid {field}: {e}"))
        };

        if row.handle.trim().is_empty() {
            return Err(corrupt("handle", &"empty"));
        }

        Ok(Self {
            id: ProductId::new(row.id),
            store_id: StoreId::new(row.store_id),
            price: Price::new(
                row.price_amount,
                row.price_currency
                    .parse()
                    .map_err(|e| corrupt("price_currency", &e))?,
            ),
            status: row.status.parse().map_err(|e| corrupt("status", &e))?,
            handle: row.handle,
            title: row.title,
            created_at: row.created_at,
        })
    }
}

/// Repository for catalog reads.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// A store's active products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_active(&self, store_id: StoreId) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, store_id, handle, title, price_amount, price_currency,
                   status, created_at
            FROM simpshopy.products
            WHERE store_id = $1 AND status = 'active'
            ORDER BY created_at DESC
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(keep_valid(rows, "product"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use simpshopy_core::{CurrencyCode, ProductStatus};

    use super::*;

    fn row() -> ProductRow {
        ProductRow {
            id: Uuid::nil(),
            store_id: Uuid::nil(),
            handle: "classic-tee".to_string(),
            title: "Classic Tee".to_string(),
            price_amount: Decimal::new(1500, 0),
            price_currency: "XOF".to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_maps_to_product() {
        let product = Product::try_from(row()).unwrap();
        assert_eq!(product.price.currency_code, CurrencyCode::XOF);
        assert_eq!(product.status, ProductStatus::Active);
        assert_eq!(product.price.format(), "1500 FCFA");
    }

    #[test]
    fn test_blank_handle_is_corrupt() {
        let mut blank = row();
        blank.handle = "  ".to_string();
        assert!(matches!(
            Product::try_from(blank),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
