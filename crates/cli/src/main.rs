//! Simpshopy CLI - Database migrations and tenant diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! simpshopy-cli migrate
//!
//! # Show how a hostname (and path) resolves
//! simpshopy-cli resolve shop.acme.com
//! simpshopy-cli resolve admin.platform.tld --path /store/acme
//!
//! # Check whether a slug can be claimed
//! simpshopy-cli check-slug new-shop
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `resolve` - Resolve a hostname against the configured database
//! - `check-slug` - Slug availability for onboarding

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "simpshopy-cli")]
#[command(author, version, about = "Simpshopy CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Resolve a hostname to the platform or a store
    Resolve {
        /// Hostname as sent in the Host header (port allowed)
        hostname: String,

        /// Request path, e.g. /store/acme
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Check whether a store slug is available
    CheckSlug {
        /// Candidate slug
        slug: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Resolve { hostname, path } => {
            commands::resolve::run(&hostname, path.as_deref()).await
        }
        Commands::CheckSlug { slug } => commands::check_slug::run(&slug).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_with_path() {
        let cli = Cli::try_parse_from(["simpshopy-cli", "resolve", "admin.platform.tld", "--path", "/store/acme"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Resolve { ref hostname, path: Some(ref p) } if hostname == "admin.platform.tld" && p == "/store/acme"
        ));
    }
}
