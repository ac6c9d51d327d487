//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! simpshopy-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `SIMPSHOPY_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Stored in `crates/storefront/migrations/` and embedded at compile time.

use secrecy::SecretString;
use simpshopy_storefront::db;

use super::CommandError;

/// Run the tenancy schema migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database URL is missing, the connection
/// fails or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let _ = dotenvy::dotenv();

    let database_url = std::env::var("SIMPSHOPY_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("SIMPSHOPY_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&SecretString::from(database_url)).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
