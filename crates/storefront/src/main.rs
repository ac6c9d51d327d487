//! Simpshopy storefront - multi-tenant public storefront service.
//!
//! This binary serves every store on port 3000. Each request is mapped to a
//! tenant from its hostname (custom domain, platform subdomain) or path
//! (`/store/{slug}` on the platform root) before it reaches a handler.
//!
//! # Architecture
//!
//! - Axum web framework serving JSON
//! - `PostgreSQL` (`simpshopy` schema) for stores, domain bindings and catalogs
//! - In-process moka cache of tenant lookups, invalidated through
//!   `LISTEN/NOTIFY` and the internal invalidation endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

use sentry::integrations::tracing as sentry_tracing;
use simpshopy_storefront::config::SimpshopyConfig;
use simpshopy_storefront::db::{self, PgTenantStore};
use simpshopy_storefront::routes;
use simpshopy_storefront::state::AppState;
use simpshopy_storefront::tenancy::{TenantCache, TenantResolver, listener};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SimpshopyConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = SimpshopyConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "simpshopy_storefront=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p simpshopy-cli -- migrate

    let mut resolver = TenantResolver::new(PgTenantStore::new(pool.clone()), config.routing.clone());
    if config.cache.is_enabled() {
        let cache = TenantCache::new(&config.cache);
        tokio::spawn(listen(pool, cache.clone()));
        resolver = resolver.with_cache(cache);
        tracing::info!(
            ttl_secs = config.cache.ttl.as_secs(),
            capacity = config.cache.capacity,
            "Tenant cache enabled"
        );
    }

    let state = AppState::new(config.clone(), resolver);
    let app = routes::router(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!(root_domain = %config.routing.root_domain(), "storefront listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Run the change listener; without it cached entries only expire by TTL.
async fn listen(pool: sqlx::PgPool, cache: TenantCache) {
    if let Err(e) = listener::listen_for_changes(pool, cache).await {
        tracing::error!(error = %e, "Tenant change listener stopped; relying on cache TTL");
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
