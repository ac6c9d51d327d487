//! Database operations for the tenant-routing `PostgreSQL` schema.
//!
//! # Schema: `simpshopy`
//!
//! ## Tables
//!
//! - `stores` - Store tenants (never deleted, suspended instead)
//! - `domain_bindings` - Subdomain and custom-domain bindings per store
//! - `products` - Store catalogs (only `active` rows are served)
//!
//! Status columns are plain `TEXT`. Rows are mapped to the typed entities in
//! `simpshopy-core` here, and a row that fails that mapping is skipped with a
//! warning rather than failing the query.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p simpshopy-cli -- migrate
//! ```

pub mod domains;
pub mod products;
pub mod stores;
pub mod tenant_store;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use domains::DomainRepository;
pub use products::ProductRepository;
pub use stores::StoreRepository;
pub use tenant_store::PgTenantStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Keep the rows that map cleanly, logging and dropping the rest.
pub(crate) fn keep_valid<R, T>(rows: Vec<R>, entity: &'static str) -> Vec<T>
where
    T: TryFrom<R, Error = RepositoryError>,
{
    rows.into_iter()
        .filter_map(|row| match T::try_from(row) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(entity, error = %e, "Skipping invalid row");
                None
            }
        })
        .collect()
}
