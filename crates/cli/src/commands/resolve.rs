//! One-off tenant resolution against the configured database.
//!
//! Useful for checking how a hostname will be routed before pointing DNS at
//! the platform:
//!
//! ```bash
//! simpshopy-cli resolve shop.acme.com
//! simpshopy-cli resolve platform.tld --path /store/acme
//! ```

use simpshopy_storefront::config::SimpshopyConfig;
use simpshopy_storefront::db::{self, PgTenantStore};
use simpshopy_storefront::tenancy::TenantResolver;

use super::CommandError;

/// Resolve `hostname` (and optional `path`) and print the result as JSON.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the database is
/// unreachable. Resolution outcomes, including transient errors, are printed.
pub async fn run(hostname: &str, path: Option<&str>) -> Result<(), CommandError> {
    let config = SimpshopyConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let resolver = TenantResolver::new(PgTenantStore::new(pool), config.routing);

    let resolution = resolver.resolve(hostname, path).await;
    tracing::info!(hostname, ?path, result = resolution.kind(), "Resolved");

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
    }
    Ok(())
}
