//! Slug availability route handler.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::Result;
use crate::state::AppState;
use crate::tenancy::{SlugAvailability, TenantStore, check_slug};

/// `GET /api/slugs/{slug}/availability`.
///
/// # Errors
///
/// Returns `AppError::Unavailable` if the store lookup fails.
pub async fn availability<S: TenantStore>(
    State(state): State<AppState<S>>,
    Path(slug): Path<String>,
) -> Result<Json<SlugAvailability>> {
    let result = check_slug(state.store(), &state.config().routing, &slug).await?;
    Ok(Json(result))
}
