//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SimpshopyConfig;
use crate::tenancy::{TenantResolver, TenantStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the tenant resolver (with its store and cache).
pub struct AppState<S> {
    inner: Arc<AppStateInner<S>>,
}

struct AppStateInner<S> {
    config: SimpshopyConfig,
    resolver: TenantResolver<S>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TenantStore> AppState<S> {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `resolver` - Tenant resolver built from `config.routing`
    #[must_use]
    pub fn new(config: SimpshopyConfig, resolver: TenantResolver<S>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, resolver }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &SimpshopyConfig {
        &self.inner.config
    }

    /// Get a reference to the tenant resolver.
    #[must_use]
    pub fn resolver(&self) -> &TenantResolver<S> {
        &self.inner.resolver
    }

    /// Get a reference to the tenant store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.inner.resolver.store()
    }
}
