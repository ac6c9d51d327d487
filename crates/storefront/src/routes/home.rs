//! Storefront home route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use simpshopy_core::{CurrencyCode, Slug, StoreId};

use super::products::ProductView;
use crate::error::Result;
use crate::middleware::{CurrentTenancy, Tenancy};
use crate::state::AppState;
use crate::tenancy::{MatchedBy, StoreContext, TenantStore};

/// Home page payload.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HomeView {
    /// Platform landing data.
    MainPlatform {
        root_domain: String,
        store_path_prefix: String,
    },
    /// A store's home page.
    Store {
        store: StoreSummary,
        matched_by: MatchedBy,
        products: Vec<ProductView>,
        catalog_available: bool,
    },
}

/// Public store details.
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    pub id: StoreId,
    pub slug: Slug,
    pub name: String,
    pub currency: CurrencyCode,
}

impl From<&StoreContext> for HomeView {
    fn from(context: &StoreContext) -> Self {
        Self::Store {
            store: StoreSummary {
                id: context.store.id,
                slug: context.store.slug.clone(),
                name: context.store.name.clone(),
                currency: context.store.currency,
            },
            matched_by: context.matched_by,
            products: context.products.iter().map(ProductView::from).collect(),
            catalog_available: context.catalog_warning.is_none(),
        }
    }
}

/// `GET /`.
pub async fn index<S: TenantStore>(
    State(state): State<AppState<S>>,
    CurrentTenancy(tenancy): CurrentTenancy,
) -> Json<HomeView> {
    let view = match tenancy {
        Tenancy::Store(context) => HomeView::from(context.as_ref()),
        Tenancy::MainPlatform => {
            let routing = &state.config().routing;
            HomeView::MainPlatform {
                root_domain: routing.root_domain().to_string(),
                store_path_prefix: routing.store_path_prefix().to_owned(),
            }
        }
    };
    Json(view)
}

/// `GET /store/{slug}`.
///
/// # Errors
///
/// Returns `AppError::StoreNotFound` when `{slug}` is not the resolved store.
pub async fn store_index<S: TenantStore>(
    state: State<AppState<S>>,
    Path(slug): Path<String>,
    CurrentTenancy(tenancy): CurrentTenancy,
) -> Result<Json<HomeView>> {
    tenancy.ensure_path_slug(&slug)?;
    Ok(index(state, CurrentTenancy(tenancy)).await)
}
