//! Internal operational endpoints.
//!
//! Protected by a bearer token (`SIMPSHOPY_INTERNAL_TOKEN`). When no token is
//! configured the endpoints answer 404.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use secrecy::ExposeSecret;
use tracing::info;

use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::tenancy::{ChangeEvent, TenantStore};

/// `POST /internal/tenant-cache/invalidate` with a `ChangeEvent` body.
///
/// # Errors
///
/// Returns `AppError::NotFound` when internal endpoints are disabled and
/// `AppError::Unauthorized` when the bearer token is missing or wrong.
pub async fn invalidate_cache<S: TenantStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    Json(event): Json<ChangeEvent>,
) -> Result<StatusCode> {
    let Some(expected) = &state.config().internal_token else {
        return Err(AppError::NotFound("internal endpoints disabled".to_string()));
    };

    let provided = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if !constant_time_compare(expected.expose_secret(), provided) {
        return Err(AppError::Unauthorized("invalid token".to_string()));
    }

    if let Some(cache) = state.resolver().cache() {
        cache.apply(&event).await;
    }
    info!(?event, "Tenant cache invalidated");

    Ok(StatusCode::NO_CONTENT)
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}
