//! Slug availability checks for store onboarding.

use serde::Serialize;
use simpshopy_core::Slug;

use super::{StoreError, TenantStore};
use crate::config::RoutingConfig;

/// Whether a candidate slug can be claimed by a new store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlugAvailability {
    /// Free to claim; `slug` is the normalized form.
    Available { slug: Slug },
    /// Not a well-formed slug.
    Invalid { reason: String },
    /// Held back for the platform.
    Reserved,
    /// Already used by another store.
    Taken,
}

impl SlugAvailability {
    /// Whether the slug can be claimed.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// Check a raw slug candidate. Input is trimmed and lower-cased first.
///
/// # Errors
///
/// Returns `StoreError` if the store lookup fails.
pub async fn check_slug<S: TenantStore>(
    store: &S,
    routing: &RoutingConfig,
    raw: &str,
) -> Result<SlugAvailability, StoreError> {
    let slug = match Slug::parse(&raw.trim().to_ascii_lowercase()) {
        Ok(slug) => slug,
        Err(e) => {
            return Ok(SlugAvailability::Invalid {
                reason: e.to_string(),
            });
        }
    };

    if routing.is_reserved_label(slug.as_str()) {
        return Ok(SlugAvailability::Reserved);
    }

    // Any status counts: a suspended store still owns its slug.
    if store.find_store_by_slug(&slug).await?.is_some() {
        return Ok(SlugAvailability::Taken);
    }

    Ok(SlugAvailability::Available { slug })
}
