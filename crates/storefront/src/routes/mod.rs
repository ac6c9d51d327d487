//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (tenant store ping)
//! GET  /api/slugs/{slug}/availability   - Slug availability for onboarding
//! POST /internal/tenant-cache/invalidate - Apply a change event (bearer token)
//!
//! # Tenant-resolved (Host / X-Forwarded-Host)
//! GET  /                                - Store home or platform info
//! GET  /store/{slug}                    - Path-addressed store home
//! GET  /store/{slug}/products           - Path-addressed catalog
//! GET  /api/store/products              - Resolved store's active catalog
//! GET  /api/store/domains               - Resolved store's bindings and canonical host
//! ```
//!
//! Routes in the first group answer on any host and keep working while
//! tenant lookups fail.

pub mod domains;
pub mod health;
pub mod home;
pub mod internal;
pub mod products;
pub mod slugs;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, resolve_tenant};
use crate::state::AppState;
use crate::tenancy::TenantStore;

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: TenantStore + 'static,
{
    let tenant_routes = Router::new()
        .route("/", get(home::index::<S>))
        .route("/store/{slug}", get(home::store_index::<S>))
        .route("/store/{slug}/products", get(products::store_list))
        .route("/api/store/products", get(products::list))
        .route("/api/store/domains", get(domains::list::<S>))
        .route_layer(from_fn_with_state(state.clone(), resolve_tenant::<S>));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness::<S>))
        .route(
            "/api/slugs/{slug}/availability",
            get(slugs::availability::<S>),
        )
        .route(
            "/internal/tenant-cache/invalidate",
            post(internal::invalidate_cache::<S>),
        )
        .merge(tenant_routes)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        store = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        #[allow(clippy::cast_possible_truncation)]
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
