//! In-memory tenant store and fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;
use simpshopy_core::{
    CurrencyCode, DomainBinding, DomainBindingId, DomainType, Hostname, Price, Product, ProductId,
    ProductStatus, Slug, StoreId, StoreStatus, StoreTenant, VerificationStatus,
};

use crate::config::{CacheConfig, RoutingConfig, SimpshopyConfig};
use crate::tenancy::{StoreError, TenantStore};

pub const TEST_INTERNAL_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

/// Tenant store backed by vectors, with failure switches and call counters.
#[derive(Default)]
pub struct InMemoryTenantStore {
    stores: RwLock<Vec<StoreTenant>>,
    bindings: RwLock<Vec<DomainBinding>>,
    products: RwLock<Vec<Product>>,
    fail_lookups: AtomicBool,
    fail_products: AtomicBool,
    binding_lookups: AtomicUsize,
    slug_lookups: AtomicUsize,
    product_lookups: AtomicUsize,
}

impl InMemoryTenantStore {
    pub fn with_store(self, store: StoreTenant) -> Self {
        self.insert_store(store);
        self
    }

    pub fn with_binding(self, binding: DomainBinding) -> Self {
        self.bindings.write().unwrap().push(binding);
        self
    }

    pub fn with_product(self, product: Product) -> Self {
        self.products.write().unwrap().push(product);
        self
    }

    pub fn insert_store(&self, store: StoreTenant) {
        self.stores.write().unwrap().push(store);
    }

    pub fn set_store_status(&self, id: StoreId, status: StoreStatus) {
        for store in self.stores.write().unwrap().iter_mut().filter(|s| s.id == id) {
            store.status = status;
        }
    }

    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    pub fn fail_products(&self, fail: bool) {
        self.fail_products.store(fail, Ordering::SeqCst);
    }

    pub fn binding_lookups(&self) -> usize {
        self.binding_lookups.load(Ordering::SeqCst)
    }

    pub fn slug_lookups(&self) -> usize {
        self.slug_lookups.load(Ordering::SeqCst)
    }

    pub fn product_lookups(&self) -> usize {
        self.product_lookups.load(Ordering::SeqCst)
    }

    fn check_lookups(&self) -> Result<(), StoreError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

impl TenantStore for InMemoryTenantStore {
    async fn find_domain_bindings(
        &self,
        hostname: &Hostname,
    ) -> Result<Vec<DomainBinding>, StoreError> {
        self.binding_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_lookups()?;
        Ok(self
            .bindings
            .read()
            .unwrap()
            .iter()
            .filter(|b| b.domain_name == *hostname)
            .cloned()
            .collect())
    }

    async fn find_store_by_slug(&self, slug: &Slug) -> Result<Option<StoreTenant>, StoreError> {
        self.slug_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_lookups()?;
        Ok(self
            .stores
            .read()
            .unwrap()
            .iter()
            .find(|s| s.slug == *slug)
            .cloned())
    }

    async fn find_store_by_id(&self, id: StoreId) -> Result<Option<StoreTenant>, StoreError> {
        self.check_lookups()?;
        Ok(self
            .stores
            .read()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_active_products(&self, store_id: StoreId) -> Result<Vec<Product>, StoreError> {
        self.product_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_products.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("statement timeout".to_string()));
        }
        Ok(self
            .products
            .read()
            .unwrap()
            .iter()
            .filter(|p| p.store_id == store_id && p.status == ProductStatus::Active)
            .cloned()
            .collect())
    }

    async fn list_store_bindings(&self, store_id: StoreId) -> Result<Vec<DomainBinding>, StoreError> {
        self.check_lookups()?;
        Ok(self
            .bindings
            .read()
            .unwrap()
            .iter()
            .filter(|b| b.store_id == store_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_lookups()
    }
}

pub fn host(s: &str) -> Hostname {
    Hostname::parse(s).unwrap()
}

pub fn routing() -> RoutingConfig {
    RoutingConfig::new("platform.tld").unwrap()
}

pub fn store_with_status(slug: &str, status: StoreStatus) -> StoreTenant {
    StoreTenant {
        id: StoreId::generate(),
        slug: Slug::parse(slug).unwrap(),
        name: format!("{slug} store"),
        status,
        currency: CurrencyCode::XOF,
        created_at: Utc::now(),
    }
}

pub fn active_store(slug: &str) -> StoreTenant {
    store_with_status(slug, StoreStatus::Active)
}

/// Active, verified, primary custom-domain binding.
pub fn custom_binding(domain: &str, store_id: StoreId) -> DomainBinding {
    DomainBinding {
        id: DomainBindingId::generate(),
        store_id,
        domain_type: DomainType::Custom,
        domain_name: host(domain),
        is_primary: true,
        verification_status: VerificationStatus::Verified,
        is_active: true,
    }
}

pub fn subdomain_binding(domain: &str, store_id: StoreId) -> DomainBinding {
    DomainBinding {
        domain_type: DomainType::Subdomain,
        ..custom_binding(domain, store_id)
    }
}

pub fn product(store_id: StoreId, handle: &str, status: ProductStatus) -> Product {
    Product {
        id: ProductId::generate(),
        store_id,
        handle: handle.to_string(),
        title: handle.replace('-', " "),
        price: Price::new(Decimal::new(5000, 0), CurrencyCode::XOF),
        status,
        created_at: Utc::now(),
    }
}

pub fn test_config() -> SimpshopyConfig {
    SimpshopyConfig {
        database_url: SecretString::from("postgres://localhost/simpshopy_test"),
        host: [127, 0, 0, 1].into(),
        port: 3000,
        routing: routing(),
        cache: CacheConfig::default(),
        trust_forwarded_host: false,
        internal_token: Some(SecretString::from(TEST_INTERNAL_TOKEN)),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    }
}
