//! Store repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use simpshopy_core::{Slug, StoreId, StoreTenant};

use super::RepositoryError;

/// Raw `simpshopy.stores` row before validation.
#[derive(Debug, sqlx::FromRow)]
pub struct StoreRow {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub status: String,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<StoreRow> for StoreTenant {
    type Error = RepositoryError;

    fn try_from(row: StoreRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("store {id}: invalid {field}: {e}"))
        };

        Ok(Self {
            id: StoreId::new(row.id),
            slug: Slug::parse(&row.slug).map_err(|e| corrupt("slug", &e))?,
            status: row.status.parse().map_err(|e| corrupt("status", &e))?,
            currency: row.currency.parse().map_err(|e| corrupt("currency", &e))?,
            name: row.name,
            created_at: row.created_at,
        })
    }
}

/// Repository for store tenant lookups.
pub struct StoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a store by slug, whatever its status.
    ///
    /// A row that fails validation is reported as a miss.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_by_slug(&self, slug: &Slug) -> Result<Option<StoreTenant>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(
            r"
            SELECT id, slug, name, status, currency, created_at
            FROM simpshopy.stores
            WHERE slug = $1
            ",
        )
        .bind(slug.as_str())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(validated))
    }

    /// Get a store by ID, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(store_id = %id))]
    pub async fn get_by_id(&self, id: StoreId) -> Result<Option<StoreTenant>, RepositoryError> {
        let row: Option<StoreRow> = sqlx::query_as(
            r"
            SELECT id, slug, name, status, currency, created_at
            FROM simpshopy.stores
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.and_then(validated))
    }
}

fn validated(row: StoreRow) -> Option<StoreTenant> {
    StoreTenant::try_from(row)
        .inspect_err(|e| warn!(error = %e, "Treating invalid store row as missing"))
        .ok()
}
