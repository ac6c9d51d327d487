//! Domain listing for the resolved store.

use axum::{Json, extract::State};
use serde::Serialize;
use simpshopy_core::{DomainBinding, DomainType, Hostname, StoreTenant, select_primary};

use crate::config::RoutingConfig;
use crate::error::Result;
use crate::middleware::RequireStore;
use crate::state::AppState;
use crate::tenancy::TenantStore;

/// The store's bindings plus the host links should point at.
#[derive(Debug, Serialize)]
pub struct DomainList {
    pub canonical_host: Hostname,
    pub domains: Vec<DomainBinding>,
}

/// `GET /api/store/domains`.
///
/// # Errors
///
/// Returns `AppError::Unavailable` if the bindings cannot be read.
pub async fn list<S: TenantStore>(
    State(state): State<AppState<S>>,
    RequireStore(context): RequireStore,
) -> Result<Json<DomainList>> {
    let domains = state.store().list_store_bindings(context.store.id).await?;
    let canonical_host = canonical_host(&context.store, &domains, &state.config().routing);
    Ok(Json(DomainList {
        canonical_host,
        domains,
    }))
}

/// Primary verified custom domain, else primary subdomain binding, else
/// `{slug}.{root}`.
pub fn canonical_host(
    store: &StoreTenant,
    bindings: &[DomainBinding],
    routing: &RoutingConfig,
) -> Hostname {
    let routable: Vec<DomainBinding> = bindings
        .iter()
        .filter(|b| b.routes_custom_traffic())
        .cloned()
        .collect();

    select_primary(&routable, DomainType::Custom)
        .or_else(|| select_primary(bindings, DomainType::Subdomain))
        .map(|b| b.domain_name.clone())
        .or_else(|| routing.root_domain().with_label(store.slug.as_str()).ok())
        .unwrap_or_else(|| routing.root_domain().clone())
}
