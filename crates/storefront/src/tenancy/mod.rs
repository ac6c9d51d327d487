//! Hostname-to-tenant resolution.
//!
//! Every storefront request carries a hostname (and a path). This module
//! decides whether that request belongs to the platform itself, to one of
//! the tenant stores, or to nobody:
//!
//! - [`resolver`] - The ordered resolution rules ([`TenantResolver`])
//! - [`resolution`] - Result types handed back to callers
//! - [`cache`] - Injected TTL cache of lookups plus invalidation events
//! - [`listener`] - Postgres change notifications driving cache invalidation
//! - [`slugs`] - Slug availability checks for onboarding
//!
//! Data access goes through the [`TenantStore`] trait so the resolver can run
//! against `PostgreSQL` in production and an in-memory store in tests.

pub mod cache;
pub mod listener;
pub mod resolution;
pub mod resolver;
pub mod slugs;

use simpshopy_core::{DomainBinding, Hostname, Product, Slug, StoreId, StoreTenant};
use thiserror::Error;

pub use cache::{CacheKey, ChangeEvent, TenantCache, TenantLookup};
pub use resolution::{IntegrityIssue, MatchedBy, Resolution, StoreContext};
pub use resolver::TenantResolver;
pub use slugs::{SlugAvailability, check_slug};

/// Errors surfaced by a [`TenantStore`].
///
/// Every variant means "could not check right now" - a missing row is an
/// `Ok(None)` / empty result, never an error.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("tenant store unavailable: {0}")]
    Unavailable(String),
}

impl From<crate::db::RepositoryError> for StoreError {
    fn from(err: crate::db::RepositoryError) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Read access to tenants, bindings and catalogs.
///
/// Implementations map their records onto the typed entities and treat a
/// malformed record as a miss.
pub trait TenantStore: Send + Sync {
    /// All bindings whose domain name equals `hostname`.
    fn find_domain_bindings(
        &self,
        hostname: &Hostname,
    ) -> impl Future<Output = Result<Vec<DomainBinding>, StoreError>> + Send;

    /// The store with this slug, whatever its status.
    fn find_store_by_slug(
        &self,
        slug: &Slug,
    ) -> impl Future<Output = Result<Option<StoreTenant>, StoreError>> + Send;

    /// The store with this ID, whatever its status.
    fn find_store_by_id(
        &self,
        id: StoreId,
    ) -> impl Future<Output = Result<Option<StoreTenant>, StoreError>> + Send;

    /// The store's products with `status = active`.
    fn list_active_products(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<Vec<Product>, StoreError>> + Send;

    /// Every binding owned by the store.
    fn list_store_bindings(
        &self,
        store_id: StoreId,
    ) -> impl Future<Output = Result<Vec<DomainBinding>, StoreError>> + Send;

    /// Cheap connectivity check for readiness.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
