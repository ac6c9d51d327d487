//! `PostgreSQL` implementation of [`TenantStore`].

use sqlx::PgPool;

use simpshopy_core::{DomainBinding, Hostname, Product, Slug, StoreId, StoreTenant};

use super::{DomainRepository, ProductRepository, StoreRepository};
use crate::tenancy::{StoreError, TenantStore};

/// Tenant store backed by the `simpshopy` schema.
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Clone)]
pub struct PgTenantStore {
    pool: PgPool,
}

impl PgTenantStore {
    /// Wrap a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl TenantStore for PgTenantStore {
    async fn find_domain_bindings(
        &self,
        hostname: &Hostname,
    ) -> Result<Vec<DomainBinding>, StoreError> {
        Ok(DomainRepository::new(&self.pool)
            .find_by_hostname(hostname)
            .await?)
    }

    async fn find_store_by_slug(&self, slug: &Slug) -> Result<Option<StoreTenant>, StoreError> {
        Ok(StoreRepository::new(&self.pool).get_by_slug(slug).await?)
    }

    async fn find_store_by_id(&self, id: StoreId) -> Result<Option<StoreTenant>, StoreError> {
        Ok(StoreRepository::new(&self.pool).get_by_id(id).await?)
    }

    async fn list_active_products(&self, store_id: StoreId) -> Result<Vec<Product>, StoreError> {
        Ok(ProductRepository::new(&self.pool)
            .list_active(store_id)
            .await?)
    }

    async fn list_store_bindings(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<DomainBinding>, StoreError> {
        Ok(DomainRepository::new(&self.pool)
            .list_for_store(store_id)
            .await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
