//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;
use crate::tenancy::TenantStore;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies the tenant store is reachable before returning OK.
/// Returns 503 Service Unavailable otherwise.
pub async fn readiness<S: TenantStore>(State(state): State<AppState<S>>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
