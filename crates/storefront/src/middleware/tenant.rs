//! Tenant resolution middleware and extractors.
//!
//! [`resolve_tenant`] runs the resolver for every storefront request and
//! either short-circuits (redirect, 404, 503) or stores a [`Tenancy`] in the
//! request extensions for handlers to pick up through [`CurrentTenancy`] or
//! [`RequireStore`].

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::Span;

use crate::error::{AppError, set_sentry_store};
use crate::state::AppState;
use crate::tenancy::{Resolution, StoreContext, StoreError, TenantStore};

/// Header set by reverse proxies carrying the client-facing host.
pub const FORWARDED_HOST_HEADER: &str = "x-forwarded-host";

/// Who a request belongs to.
#[derive(Debug, Clone)]
pub enum Tenancy {
    /// The platform itself (marketing site, admin console, development).
    MainPlatform,
    /// A tenant store.
    Store(Arc<StoreContext>),
}

/// Resolve the request's tenant, or answer it directly.
pub async fn resolve_tenant<S>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Response
where
    S: TenantStore + 'static,
{
    let Some(hostname) = request_host(
        request.headers(),
        request.uri().host(),
        state.config().trust_forwarded_host,
    ) else {
        return AppError::BadRequest("Missing Host header".to_string()).into_response();
    };
    let path = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), ToString::to_string);

    let tenancy = match state.resolver().resolve(&hostname, Some(&path)).await {
        Resolution::MainPlatform => Tenancy::MainPlatform,
        Resolution::Store(context) => {
            Span::current().record("store", context.store.slug.as_str());
            set_sentry_store(context.store.slug.as_str());
            Tenancy::Store(Arc::new(*context))
        }
        Resolution::Redirect { location } => {
            return Redirect::permanent(&location).into_response();
        }
        Resolution::NotFound => return AppError::StoreNotFound.into_response(),
        Resolution::AmbiguousOrUnverified { issue } => {
            return AppError::StoreUnavailable(issue).into_response();
        }
        Resolution::TransientError { reason } => {
            return AppError::Unavailable(StoreError::Unavailable(reason)).into_response();
        }
    };

    request.extensions_mut().insert(tenancy);
    next.run(request).await
}

/// The host the client asked for.
///
/// `X-Forwarded-Host` is only honored behind a trusted proxy; the first
/// entry of a comma-separated list wins. Falls back to the request target
/// for absolute-form URIs.
fn request_host(headers: &HeaderMap, uri_host: Option<&str>, trust_forwarded: bool) -> Option<String> {
    let forwarded = trust_forwarded
        .then(|| headers.get(FORWARDED_HOST_HEADER))
        .flatten();

    forwarded
        .or_else(|| headers.get(header::HOST))
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or(uri_host)
        .map(str::to_owned)
}

/// Extractor for the resolved [`Tenancy`].
///
/// Fails with 500 if the route is not behind [`resolve_tenant`].
pub struct CurrentTenancy(pub Tenancy);

impl<S> FromRequestParts<S> for CurrentTenancy
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Tenancy>()
            .cloned()
            .map(Self)
            .ok_or_else(|| AppError::Internal("tenant middleware not installed".to_string()))
    }
}

/// Extractor that requires a tenant store.
///
/// Requests for the main platform are rejected with 404.
pub struct RequireStore(pub Arc<StoreContext>);

impl<S> FromRequestParts<S> for RequireStore
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match CurrentTenancy::from_request_parts(parts, state).await?.0 {
            Tenancy::Store(context) => Ok(Self(context)),
            Tenancy::MainPlatform => Err(AppError::StoreNotFound),
        }
    }
}

impl Tenancy {
    /// Reject a `/store/{slug}` path naming a store other than the resolved
    /// one, e.g. `shop.acme.com/store/other`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::StoreNotFound` on a mismatch.
    pub fn ensure_path_slug(&self, path_slug: &str) -> Result<(), AppError> {
        match self {
            Self::Store(context) if !context.store.slug.as_str().eq_ignore_ascii_case(path_slug) => {
                Err(AppError::StoreNotFound)
            }
            _ => Ok(()),
        }
    }
}
