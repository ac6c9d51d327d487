//! Domain binding repository for database operations.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use simpshopy_core::{DomainBinding, DomainBindingId, Hostname, StoreId};

use super::{RepositoryError, keep_valid};

/// Raw `simpshopy.domain_bindings` row before validation.
#[derive(Debug, sqlx::FromRow)]
pub struct DomainBindingRow {
    pub id: Uuid,
    pub store_id: Uuid,
    pub domain_type: String,
    pub domain_name: String,
    pub is_primary: bool,
    pub verification_status: String,
    pub is_active: bool,
}

impl TryFrom<DomainBindingRow> for DomainBinding {
    type Error = RepositoryError;

    fn try_from(row: DomainBindingRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |field: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("domain binding {id}: invalid {field}: {e}"))
        };

        Ok(Self {
            id: DomainBindingId::new(row.id),
            store_id: StoreId::new(row.store_id),
            domain_type: row.domain_type.parse().map_err(|e| corrupt("domain_type", &e))?,
            domain_name: Hostname::parse(&row.domain_name)
                .map_err(|e| corrupt("domain_name", &e))?,
            is_primary: row.is_primary,
            verification_status: row
                .verification_status
                .parse()
                .map_err(|e| corrupt("verification_status", &e))?,
            is_active: row.is_active,
        })
    }
}

/// Repository for domain binding lookups.
pub struct DomainRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DomainRepository<'a> {
    /// Create a new domain repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every binding for `hostname`, of any type, status or owner.
    ///
    /// All rows are returned (not just the first) so callers can detect
    /// duplicate verified bindings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(hostname = %hostname))]
    pub async fn find_by_hostname(
        &self,
        hostname: &Hostname,
    ) -> Result<Vec<DomainBinding>, RepositoryError> {
        let rows: Vec<DomainBindingRow> = sqlx::query_as(
            r"
            SELECT id, store_id, domain_type, domain_name, is_primary,
                   verification_status, is_active
            FROM simpshopy.domain_bindings
            WHERE lower(domain_name) = $1
            ORDER BY created_at
            ",
        )
        .bind(hostname.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(keep_valid(rows, "domain_binding"))
    }

    /// Every binding owned by a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(store_id = %store_id))]
    pub async fn list_for_store(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<DomainBinding>, RepositoryError> {
        let rows: Vec<DomainBindingRow> = sqlx::query_as(
            r"
            SELECT id, store_id, domain_type, domain_name, is_primary,
                   verification_status, is_active
            FROM simpshopy.domain_bindings
            WHERE store_id = $1
            ORDER BY domain_type, domain_name
            ",
        )
        .bind(store_id)
        .fetch_all(self.pool)
        .await?;

        Ok(keep_valid(rows, "domain_binding"))
    }
}
