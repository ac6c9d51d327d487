//! Slug availability check.

use simpshopy_storefront::config::SimpshopyConfig;
use simpshopy_storefront::db::{self, PgTenantStore};
use simpshopy_storefront::tenancy::check_slug;

use super::CommandError;

/// Check whether `slug` can be claimed and print the result as JSON.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the lookup fails.
pub async fn run(slug: &str) -> Result<(), CommandError> {
    let config = SimpshopyConfig::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    let store = PgTenantStore::new(pool);

    let availability = check_slug(&store, &config.routing, slug).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{}", serde_json::to_string_pretty(&availability)?);
    }
    Ok(())
}
