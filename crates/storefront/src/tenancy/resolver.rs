//! Tenant resolver.
//!
//! Rules, first match wins:
//!
//! 1. Any host containing `localhost` is the main platform (development).
//! 2. The platform root and its `www` alias are the main platform, except
//!    store paths (`/store/{slug}`), which resolve by slug.
//! 3. The admin host is the main platform, except store paths, which are
//!    redirected to the same path on the platform root.
//! 4. An active, verified custom-domain binding resolves to its store.
//! 5. On a direct subdomain of the platform root, the first label is looked
//!    up as a store slug, unless it is `www`, the admin label or a reserved
//!    slug. Other hosts never reach a slug lookup.
//! 6. Otherwise nothing matched.

use simpshopy_core::{Hostname, ProductStatus, Slug, StoreId, StoreTenant};
use tracing::{debug, error, instrument, warn};

use super::cache::{CacheKey, TenantCache, TenantLookup};
use super::resolution::{IntegrityIssue, MatchedBy, Resolution, StoreContext};
use super::{StoreError, TenantStore};
use crate::config::RoutingConfig;

/// Maps inbound hostnames and paths onto tenants.
///
/// Holds no per-request state; one instance serves every request.
pub struct TenantResolver<S> {
    store: S,
    routing: RoutingConfig,
    cache: Option<TenantCache>,
}

impl<S: TenantStore> TenantResolver<S> {
    /// Create a resolver without a cache.
    #[must_use]
    pub const fn new(store: S, routing: RoutingConfig) -> Self {
        Self {
            store,
            routing,
            cache: None,
        }
    }

    /// Attach a lookup cache.
    #[must_use]
    pub fn with_cache(mut self, cache: TenantCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// The underlying tenant store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The routing rules in use.
    #[must_use]
    pub const fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// The lookup cache, if one is attached.
    #[must_use]
    pub const fn cache(&self) -> Option<&TenantCache> {
        self.cache.as_ref()
    }

    /// Resolve a request's hostname and optional path (which may carry a
    /// query string).
    #[instrument(skip(self), fields(result = tracing::field::Empty))]
    pub async fn resolve(&self, hostname: &str, path: Option<&str>) -> Resolution {
        let resolution = self.resolve_inner(hostname, path).await;
        tracing::Span::current().record("result", resolution.kind());
        resolution
    }

    async fn resolve_inner(&self, hostname: &str, path: Option<&str>) -> Resolution {
        let lowered = hostname.trim().to_ascii_lowercase();
        if lowered.contains("localhost") {
            return Resolution::MainPlatform;
        }

        let host = match Hostname::parse(&lowered) {
            Ok(host) => host,
            Err(e) => {
                debug!(error = %e, "Unparseable hostname");
                return Resolution::NotFound;
            }
        };
        let store_path = path.filter(|p| self.routing.is_store_path(p));

        if self.routing.is_platform_root(&host) {
            return match store_path {
                Some(path) => self.resolve_store_path(path).await,
                None => Resolution::MainPlatform,
            };
        }

        if self.routing.is_admin_host(&host) {
            return match store_path {
                Some(path) => Resolution::Redirect {
                    location: self.routing.platform_url(path),
                },
                None => Resolution::MainPlatform,
            };
        }

        let key = CacheKey::Host(host.clone());
        match self.cached_lookup(key, || self.lookup_host(&host)).await {
            Ok(lookup) => self.finish(lookup, host.as_str()).await,
            Err(e) => transient(&e),
        }
    }

    /// Path-based addressing on the platform root.
    async fn resolve_store_path(&self, path: &str) -> Resolution {
        let Some(segment) = self.routing.store_path_slug(path) else {
            return Resolution::NotFound;
        };
        let Ok(slug) = Slug::parse(&segment.to_ascii_lowercase()) else {
            debug!(segment, "Store path segment is not a valid slug");
            return Resolution::NotFound;
        };
        if self.routing.is_reserved_slug(slug.as_str()) {
            return Resolution::NotFound;
        }

        let key = CacheKey::Slug(slug.clone());
        match self
            .cached_lookup(key, || self.lookup_slug(&slug, MatchedBy::StorePath))
            .await
        {
            Ok(lookup) => self.finish(lookup, path).await,
            Err(e) => transient(&e),
        }
    }

    /// Custom domain, then subdomain.
    async fn lookup_host(&self, host: &Hostname) -> Result<TenantLookup, StoreError> {
        let bindings = self.store.find_domain_bindings(host).await?;
        let routable: Vec<_> = bindings
            .iter()
            .filter(|b| b.domain_name == *host && b.routes_custom_traffic())
            .collect();

        match routable.as_slice() {
            [] => {}
            [binding] => return self.lookup_bound_store(binding.store_id).await,
            many => {
                return Ok(TenantLookup::Integrity(
                    IntegrityIssue::DuplicateVerifiedBindings { count: many.len() },
                ));
            }
        }

        if !self.routing.is_platform_subdomain(host) {
            debug!(%host, "No custom binding and not a platform subdomain");
            return Ok(TenantLookup::NotFound);
        }
        let label = host.first_label();
        if self.routing.is_reserved_label(label) {
            // Path addressing only applies to the platform root, handled earlier.
            debug!(label, "Reserved label, skipping subdomain lookup");
            return Ok(TenantLookup::NotFound);
        }
        let Ok(slug) = Slug::parse(label) else {
            return Ok(TenantLookup::NotFound);
        };

        self.lookup_slug(&slug, MatchedBy::Subdomain).await
    }

    async fn lookup_bound_store(&self, store_id: StoreId) -> Result<TenantLookup, StoreError> {
        let lookup = match self.store.find_store_by_id(store_id).await? {
            None => TenantLookup::Integrity(IntegrityIssue::MissingStore { store_id }),
            Some(store) if !store.is_servable() => {
                TenantLookup::Integrity(IntegrityIssue::InactiveStore {
                    store_id,
                    status: store.status,
                })
            }
            Some(store) => TenantLookup::Found {
                store,
                matched_by: MatchedBy::CustomDomain,
            },
        };
        Ok(lookup)
    }

    async fn lookup_slug(
        &self,
        slug: &Slug,
        matched_by: MatchedBy,
    ) -> Result<TenantLookup, StoreError> {
        let lookup = match self.store.find_store_by_slug(slug).await? {
            Some(store) if store.is_servable() && store.slug == *slug => {
                TenantLookup::Found { store, matched_by }
            }
            _ => TenantLookup::NotFound,
        };
        Ok(lookup)
    }

    async fn cached_lookup<F, Fut>(&self, key: CacheKey, lookup: F) -> Result<TenantLookup, StoreError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TenantLookup, StoreError>>,
    {
        let Some(cache) = &self.cache else {
            return lookup().await;
        };
        if let Some(hit) = cache.get(&key).await {
            return Ok(hit);
        }

        let generation = cache.generation();
        let outcome = lookup().await?;
        cache.insert_if_current(key, outcome.clone(), generation).await;
        Ok(outcome)
    }

    async fn finish(&self, lookup: TenantLookup, address: &str) -> Resolution {
        match lookup {
            TenantLookup::Found { store, matched_by } => {
                Resolution::Store(Box::new(self.load_context(store, matched_by).await))
            }
            TenantLookup::NotFound => Resolution::NotFound,
            TenantLookup::Integrity(issue) => {
                error!(address, %issue, "Tenant binding integrity violation");
                Resolution::AmbiguousOrUnverified { issue }
            }
        }
    }

    async fn load_context(&self, store: StoreTenant, matched_by: MatchedBy) -> StoreContext {
        match self.store.list_active_products(store.id).await {
            Ok(mut products) => {
                products.retain(|p| p.store_id == store.id && p.status == ProductStatus::Active);
                StoreContext {
                    store,
                    products,
                    catalog_warning: None,
                    matched_by,
                }
            }
            Err(e) => {
                warn!(store_id = %store.id, error = %e, "Catalog unavailable, serving store without products");
                StoreContext {
                    store,
                    products: Vec::new(),
                    catalog_warning: Some(e.to_string()),
                    matched_by,
                }
            }
        }
    }
}

fn transient(err: &StoreError) -> Resolution {
    warn!(error = %err, "Tenant lookup failed");
    Resolution::TransientError {
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use simpshopy_core::{DomainBinding, Product, StoreStatus, VerificationStatus};

    use super::*;
    use crate::config::CacheConfig;
    use crate::tenancy::ChangeEvent;
    use crate::testing::{
        InMemoryTenantStore, active_store, custom_binding, product, routing, store_with_status,
    };

    fn resolver(store: InMemoryTenantStore) -> TenantResolver<InMemoryTenantStore> {
        TenantResolver::new(store, routing())
    }

    fn cached_resolver(store: InMemoryTenantStore) -> TenantResolver<InMemoryTenantStore> {
        resolver(store).with_cache(TenantCache::new(&CacheConfig {
            ttl: Duration::from_secs(60),
            capacity: 100,
        }))
    }

    /// Acme with a verified custom domain, two active products and a draft.
    fn acme_fixture() -> (InMemoryTenantStore, StoreTenant) {
        let acme = active_store("acme-co");
        let store = InMemoryTenantStore::default()
            .with_store(acme.clone())
            .with_binding(custom_binding("shop.acme.com", acme.id))
            .with_product(product(acme.id, "tee", ProductStatus::Active))
            .with_product(product(acme.id, "mug", ProductStatus::Active))
            .with_product(product(acme.id, "draft-hat", ProductStatus::Draft));
        (store, acme)
    }

    /// Suspends a store and reports the change while the first lookup of it
    /// by ID is still in flight, returning the pre-suspension row.
    struct SuspendedMidLookup {
        inner: InMemoryTenantStore,
        cache: TenantCache,
        fired: AtomicBool,
    }

    impl TenantStore for SuspendedMidLookup {
        async fn find_domain_bindings(
            &self,
            hostname: &Hostname,
        ) -> Result<Vec<DomainBinding>, StoreError> {
            self.inner.find_domain_bindings(hostname).await
        }

        async fn find_store_by_slug(&self, slug: &Slug) -> Result<Option<StoreTenant>, StoreError> {
            self.inner.find_store_by_slug(slug).await
        }

        async fn find_store_by_id(&self, id: StoreId) -> Result<Option<StoreTenant>, StoreError> {
            let snapshot = self.inner.find_store_by_id(id).await?;
            if !self.fired.swap(true, Ordering::SeqCst) {
                self.inner.set_store_status(id, StoreStatus::Suspended);
                self.cache
                    .apply(&ChangeEvent::Store {
                        store_id: id,
                        slug: None,
                    })
                    .await;
            }
            Ok(snapshot)
        }

        async fn list_active_products(&self, store_id: StoreId) -> Result<Vec<Product>, StoreError> {
            self.inner.list_active_products(store_id).await
        }

        async fn list_store_bindings(
            &self,
            store_id: StoreId,
        ) -> Result<Vec<DomainBinding>, StoreError> {
            self.inner.list_store_bindings(store_id).await
        }

        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }
    }

    fn expect_store(resolution: &Resolution) -> &StoreContext {
        resolution
            .store()
            .unwrap_or_else(|| panic!("expected a store, got {resolution:?}"))
    }

    #[tokio::test]
    async fn test_localhost_is_main_platform() {
        let resolver = resolver(InMemoryTenantStore::default());
        assert_eq!(
            resolver.resolve("localhost:5173", Some("/anything")).await,
            Resolution::MainPlatform
        );
        assert_eq!(
            resolver.resolve("acme.localhost", Some("/store/acme")).await,
            Resolution::MainPlatform
        );
        assert_eq!(resolver.store().binding_lookups(), 0);
    }

    #[tokio::test]
    async fn test_platform_root_and_www_are_main_platform() {
        let resolver = resolver(InMemoryTenantStore::default());
        assert_eq!(resolver.resolve("platform.tld", None).await, Resolution::MainPlatform);
        assert_eq!(
            resolver.resolve("www.platform.tld", None).await,
            Resolution::MainPlatform
        );
        assert_eq!(
            resolver.resolve("WWW.Platform.TLD", Some("/pricing")).await,
            Resolution::MainPlatform
        );
        assert_eq!(resolver.store().binding_lookups(), 0);
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_admin_host_is_main_platform() {
        let resolver = resolver(InMemoryTenantStore::default());
        assert_eq!(
            resolver.resolve("admin.platform.tld", Some("/dashboard")).await,
            Resolution::MainPlatform
        );
        assert_eq!(
            resolver.resolve("admin.platform.tld", None).await,
            Resolution::MainPlatform
        );
    }

    #[tokio::test]
    async fn test_admin_host_store_path_redirects_to_platform_root() {
        let resolver = resolver(InMemoryTenantStore::default());
        assert_eq!(
            resolver.resolve("admin.platform.tld", Some("/store/acme")).await,
            Resolution::Redirect {
                location: "https://platform.tld/store/acme".to_string()
            }
        );
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_verified_custom_domain_resolves_with_active_products() {
        let (store, acme) = acme_fixture();
        let resolver = resolver(store);

        let resolution = resolver.resolve("shop.acme.com", None).await;
        let context = expect_store(&resolution);
        assert_eq!(context.store, acme);
        assert_eq!(context.matched_by, MatchedBy::CustomDomain);
        assert_eq!(context.products.len(), 2);
        assert!(context.products.iter().all(|p| p.status == ProductStatus::Active));
        assert!(context.catalog_warning.is_none());
    }

    #[tokio::test]
    async fn test_subdomain_resolves_active_store() {
        let acme = active_store("acme");
        let resolver = resolver(InMemoryTenantStore::default().with_store(acme.clone()));

        let resolution = resolver.resolve("acme.platform.tld", None).await;
        let context = expect_store(&resolution);
        assert_eq!(context.store.id, acme.id);
        assert_eq!(context.matched_by, MatchedBy::Subdomain);
    }

    #[tokio::test]
    async fn test_unknown_subdomain_is_not_found() {
        let resolver = resolver(InMemoryTenantStore::default().with_store(active_store("acme")));
        assert_eq!(
            resolver.resolve("random123.platform.tld", None).await,
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn test_suspended_or_draft_subdomain_is_not_found() {
        let store = InMemoryTenantStore::default()
            .with_store(store_with_status("paused", StoreStatus::Suspended))
            .with_store(store_with_status("soon", StoreStatus::Draft));
        let resolver = resolver(store);
        assert_eq!(resolver.resolve("paused.platform.tld", None).await, Resolution::NotFound);
        assert_eq!(resolver.resolve("soon.platform.tld", None).await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_hostname_matching_is_case_insensitive() {
        let acme = active_store("acme");
        let resolver = resolver(InMemoryTenantStore::default().with_store(acme));
        let upper = resolver.resolve("ACME.platform.tld", None).await;
        let lower = resolver.resolve("acme.platform.tld", None).await;
        assert_eq!(upper, lower);
        assert!(upper.store().is_some());
    }

    #[tokio::test]
    async fn test_resolve_is_idempotent() {
        let (store, _) = acme_fixture();
        let resolver = resolver(store);
        for (host, path) in [
            ("shop.acme.com", None),
            ("acme-co.platform.tld", Some("/")),
            ("nobody.platform.tld", None),
            ("platform.tld", Some("/store/acme-co")),
        ] {
            let first = resolver.resolve(host, path).await;
            let second = resolver.resolve(host, path).await;
            assert_eq!(first, second, "{host} {path:?}");
        }
    }

    #[tokio::test]
    async fn test_custom_domain_beats_subdomain() {
        let owner = active_store("owner");
        let squatter = active_store("acme");
        let store = InMemoryTenantStore::default()
            .with_store(owner.clone())
            .with_store(squatter)
            .with_binding(custom_binding("acme.platform.tld", owner.id));
        let resolver = resolver(store);

        let resolution = resolver.resolve("acme.platform.tld", None).await;
        let context = expect_store(&resolution);
        assert_eq!(context.store.id, owner.id);
        assert_eq!(context.matched_by, MatchedBy::CustomDomain);
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_verified_bindings_fail_closed() {
        let first = active_store("first");
        let second = active_store("second");
        let store = InMemoryTenantStore::default()
            .with_store(first.clone())
            .with_store(second.clone())
            .with_binding(custom_binding("shop.shared.com", first.id))
            .with_binding(custom_binding("shop.shared.com", second.id));
        let resolver = resolver(store);

        assert_eq!(
            resolver.resolve("shop.shared.com", None).await,
            Resolution::AmbiguousOrUnverified {
                issue: IntegrityIssue::DuplicateVerifiedBindings { count: 2 }
            }
        );
    }

    #[tokio::test]
    async fn test_inactive_duplicate_does_not_count() {
        let first = active_store("first");
        let second = active_store("second");
        let mut stale = custom_binding("shop.shared.com", second.id);
        stale.is_active = false;
        let store = InMemoryTenantStore::default()
            .with_store(first.clone())
            .with_store(second)
            .with_binding(custom_binding("shop.shared.com", first.id))
            .with_binding(stale);
        let resolver = resolver(store);

        let resolution = resolver.resolve("shop.shared.com", None).await;
        assert_eq!(expect_store(&resolution).store.id, first.id);
    }

    #[tokio::test]
    async fn test_suspended_store_behind_custom_domain_is_unavailable() {
        let paused = store_with_status("paused", StoreStatus::Suspended);
        let store = InMemoryTenantStore::default()
            .with_store(paused.clone())
            .with_binding(custom_binding("paused.example.com", paused.id));
        let resolver = resolver(store);

        assert_eq!(
            resolver.resolve("paused.example.com", None).await,
            Resolution::AmbiguousOrUnverified {
                issue: IntegrityIssue::InactiveStore {
                    store_id: paused.id,
                    status: StoreStatus::Suspended
                }
            }
        );
    }

    #[tokio::test]
    async fn test_binding_to_missing_store_is_unavailable() {
        let ghost = StoreId::generate();
        let store = InMemoryTenantStore::default().with_binding(custom_binding("ghost.example.com", ghost));
        let resolver = resolver(store);
        assert_eq!(
            resolver.resolve("ghost.example.com", None).await,
            Resolution::AmbiguousOrUnverified {
                issue: IntegrityIssue::MissingStore { store_id: ghost }
            }
        );
    }

    #[tokio::test]
    async fn test_unverified_custom_domain_falls_through() {
        let acme = active_store("acme");
        let mut pending = custom_binding("shop.acme.com", acme.id);
        pending.verification_status = VerificationStatus::Pending;
        let store = InMemoryTenantStore::default()
            .with_store(acme)
            .with_binding(pending);
        let resolver = resolver(store);

        // Not under the platform root, so no subdomain lookup either.
        assert_eq!(resolver.resolve("shop.acme.com", None).await, Resolution::NotFound);
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_reserved_labels_never_trigger_slug_lookup() {
        let store = InMemoryTenantStore::default()
            .with_store(store_with_status("api", StoreStatus::Active));
        let resolver = resolver(store);

        for host in ["api.platform.tld", "www.acme.com", "admin.acme.com", "cdn.platform.tld"] {
            assert_eq!(resolver.resolve(host, None).await, Resolution::NotFound, "{host}");
        }
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_foreign_host_never_borrows_a_slug() {
        let resolver = resolver(InMemoryTenantStore::default().with_store(active_store("acme")));

        for host in ["acme.attacker.com", "acme.evilplatform.tld", "acme.shop.platform.tld"] {
            assert_eq!(resolver.resolve(host, None).await, Resolution::NotFound, "{host}");
        }
        assert_eq!(resolver.store().binding_lookups(), 3);
        assert_eq!(resolver.store().slug_lookups(), 0);
    }

    #[tokio::test]
    async fn test_www_custom_domain_still_resolves() {
        let acme = active_store("acme");
        let store = InMemoryTenantStore::default()
            .with_store(acme.clone())
            .with_binding(custom_binding("www.acme.com", acme.id));
        let resolver = resolver(store);

        let resolution = resolver.resolve("www.acme.com", None).await;
        assert_eq!(expect_store(&resolution).store.id, acme.id);
    }

    #[tokio::test]
    async fn test_store_path_on_platform_root() {
        let acme = active_store("acme");
        let resolver = resolver(InMemoryTenantStore::default().with_store(acme.clone()));

        let resolution = resolver.resolve("platform.tld", Some("/store/acme")).await;
        let context = expect_store(&resolution);
        assert_eq!(context.store.id, acme.id);
        assert_eq!(context.matched_by, MatchedBy::StorePath);

        let resolution = resolver
            .resolve("www.platform.tld", Some("/store/ACME/products/tee?ref=ig"))
            .await;
        assert_eq!(expect_store(&resolution).store.id, acme.id);

        assert_eq!(
            resolver.resolve("platform.tld", Some("/store/missing")).await,
            Resolution::NotFound
        );
        assert_eq!(
            resolver.resolve("platform.tld", Some("/store/")).await,
            Resolution::NotFound
        );
        assert_eq!(
            resolver.resolve("platform.tld", Some("/store/admin")).await,
            Resolution::NotFound
        );
    }

    #[tokio::test]
    async fn test_invalid_hostname_is_not_found() {
        let resolver = resolver(InMemoryTenantStore::default());
        assert_eq!(resolver.resolve("", None).await, Resolution::NotFound);
        assert_eq!(resolver.resolve("bad host", None).await, Resolution::NotFound);
        assert_eq!(resolver.store().binding_lookups(), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_transient_not_not_found() {
        let (store, _) = acme_fixture();
        store.fail_lookups(true);
        let resolver = resolver(store);

        assert!(matches!(
            resolver.resolve("shop.acme.com", None).await,
            Resolution::TransientError { .. }
        ));
        assert!(matches!(
            resolver.resolve("platform.tld", Some("/store/acme-co")).await,
            Resolution::TransientError { .. }
        ));
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_store_resolution() {
        let (store, acme) = acme_fixture();
        store.fail_products(true);
        let resolver = resolver(store);

        let resolution = resolver.resolve("shop.acme.com", None).await;
        let context = expect_store(&resolution);
        assert_eq!(context.store, acme);
        assert!(context.products.is_empty());
        assert!(context.catalog_warning.is_some());
    }

    #[tokio::test]
    async fn test_cache_serves_repeat_lookups() {
        let (store, _) = acme_fixture();
        let resolver = cached_resolver(store);

        let first = resolver.resolve("shop.acme.com", None).await;
        let second = resolver.resolve("SHOP.ACME.COM", None).await;
        assert_eq!(first, second);
        assert_eq!(resolver.store().binding_lookups(), 1);
        // Catalog is always read fresh.
        assert_eq!(resolver.store().product_lookups(), 2);
    }

    #[tokio::test]
    async fn test_transient_errors_are_not_cached() {
        let (store, _) = acme_fixture();
        store.fail_lookups(true);
        let resolver = cached_resolver(store);

        assert!(matches!(
            resolver.resolve("shop.acme.com", None).await,
            Resolution::TransientError { .. }
        ));
        resolver.store().fail_lookups(false);
        assert!(resolver.resolve("shop.acme.com", None).await.store().is_some());
    }

    #[tokio::test]
    async fn test_change_during_lookup_is_not_cached() {
        let (inner, acme) = acme_fixture();
        let cache = TenantCache::new(&CacheConfig {
            ttl: Duration::from_secs(60),
            capacity: 100,
        });
        let store = SuspendedMidLookup {
            inner,
            cache: cache.clone(),
            fired: AtomicBool::new(false),
        };
        let resolver = TenantResolver::new(store, routing()).with_cache(cache);

        // The in-flight read still saw the store as active.
        let first = resolver.resolve("shop.acme.com", None).await;
        assert_eq!(expect_store(&first).store.id, acme.id);

        assert_eq!(
            resolver.resolve("shop.acme.com", None).await,
            Resolution::AmbiguousOrUnverified {
                issue: IntegrityIssue::InactiveStore {
                    store_id: acme.id,
                    status: StoreStatus::Suspended
                }
            }
        );
    }

    #[tokio::test]
    async fn test_store_change_invalidates_cached_miss() {
        let resolver = cached_resolver(InMemoryTenantStore::default());
        assert_eq!(resolver.resolve("late.platform.tld", None).await, Resolution::NotFound);

        let late = active_store("late");
        resolver.store().insert_store(late.clone());
        // Still the cached miss.
        assert_eq!(resolver.resolve("late.platform.tld", None).await, Resolution::NotFound);

        resolver
            .cache()
            .unwrap()
            .apply(&ChangeEvent::Store {
                store_id: late.id,
                slug: Some(late.slug.clone()),
            })
            .await;
        let resolution = resolver.resolve("late.platform.tld", None).await;
        assert_eq!(expect_store(&resolution).store.id, late.id);
    }
}
