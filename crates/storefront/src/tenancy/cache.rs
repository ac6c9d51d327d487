//! Tenant lookup cache.
//!
//! Caches the outcome of the database part of resolution (custom domain and
//! subdomain lookups keyed by hostname, path lookups keyed by slug) using
//! `moka` with a configurable TTL. Catalogs are not cached, and neither are
//! transient failures.
//!
//! The cache is handed to the resolver explicitly. Entries are dropped early
//! through [`TenantCache::apply`] whenever the data layer reports a change.
//! Every invalidation bumps a generation counter, and outcomes read before
//! the bump are never written back (see [`TenantCache::insert_if_current`]).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use simpshopy_core::{Hostname, Slug, StoreId, StoreTenant};
use tracing::{debug, warn};

use super::resolution::{IntegrityIssue, MatchedBy};
use crate::config::CacheConfig;

/// Cache key for tenant lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// Custom-domain / subdomain outcome for a hostname.
    Host(Hostname),
    /// Path-addressed outcome for a slug.
    Slug(Slug),
}

/// Cached lookup outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantLookup {
    Found { store: StoreTenant, matched_by: MatchedBy },
    NotFound,
    Integrity(IntegrityIssue),
}

impl TenantLookup {
    fn store_id(&self) -> Option<StoreId> {
        match self {
            Self::Found { store, .. } => Some(store.id),
            Self::Integrity(
                IntegrityIssue::InactiveStore { store_id, .. }
                | IntegrityIssue::MissingStore { store_id },
            ) => Some(*store_id),
            Self::NotFound | Self::Integrity(IntegrityIssue::DuplicateVerifiedBindings { .. }) => {
                None
            }
        }
    }
}

/// A change reported by the data layer.
///
/// Serialized as `{"kind": "domain", "hostname": "shop.acme.com"}`,
/// `{"kind": "store", "store_id": "...", "slug": "acme"}` or `{"kind": "all"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChangeEvent {
    /// A binding for this hostname was added, changed or removed.
    Domain { hostname: Hostname },
    /// A store's status or slug changed.
    Store {
        store_id: StoreId,
        #[serde(default)]
        slug: Option<Slug>,
    },
    /// Anything else; drop everything.
    All,
}

/// TTL-bounded cache of tenant lookups.
///
/// Cloning is cheap and clones share entries.
#[derive(Clone)]
pub struct TenantCache {
    inner: Cache<CacheKey, TenantLookup>,
    generation: Arc<AtomicU64>,
}

impl TenantCache {
    /// Build a cache from configuration.
    #[must_use]
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.capacity)
            .time_to_live(config.ttl)
            .support_invalidation_closures()
            .build();

        Self {
            inner,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Number of invalidations applied so far.
    ///
    /// Read it before querying the data layer and hand it to
    /// [`insert_if_current`](Self::insert_if_current) with the outcome.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Look up a cached outcome.
    pub async fn get(&self, key: &CacheKey) -> Option<TenantLookup> {
        let hit = self.inner.get(key).await;
        if hit.is_some() {
            debug!(?key, "Tenant cache hit");
        }
        hit
    }

    /// Store an outcome.
    pub async fn insert(&self, key: CacheKey, lookup: TenantLookup) {
        self.inner.insert(key, lookup).await;
    }

    /// Store an outcome read at generation `seen`, unless an invalidation
    /// ran in the meantime. Returns whether the entry was kept.
    ///
    /// The generation is checked again after the write: an invalidation that
    /// lands between the first check and the insert removes the entry.
    pub async fn insert_if_current(&self, key: CacheKey, lookup: TenantLookup, seen: u64) -> bool {
        if self.generation() != seen {
            debug!(?key, "Tenant changed during lookup, not caching");
            return false;
        }
        self.inner.insert(key.clone(), lookup).await;
        if self.generation() != seen {
            debug!(?key, "Tenant changed during lookup, dropping entry");
            self.inner.invalidate(&key).await;
            return false;
        }
        true
    }

    /// Drop the entry for one hostname.
    pub async fn invalidate_host(&self, hostname: &Hostname) {
        self.bump();
        self.inner
            .invalidate(&CacheKey::Host(hostname.clone()))
            .await;
    }

    /// Drop every entry that involves a store: entries holding it, its slug
    /// entry, and hostname entries whose first label is the slug (which may
    /// hold a cached miss from before the store existed).
    pub fn invalidate_store(&self, store_id: StoreId, slug: Option<&Slug>) {
        self.bump();
        let slug = slug.cloned();
        let result = self.inner.invalidate_entries_if(move |key, lookup| {
            if lookup.store_id() == Some(store_id) {
                return true;
            }
            match (key, &slug) {
                (CacheKey::Slug(cached), Some(slug)) => cached == slug,
                (CacheKey::Host(host), Some(slug)) => host.first_label() == slug.as_str(),
                _ => false,
            }
        });

        if let Err(e) = result {
            warn!(error = %e, %store_id, "Predicate invalidation failed, flushing tenant cache");
            self.invalidate_all();
        }
    }

    /// Drop everything.
    pub fn invalidate_all(&self) {
        self.bump();
        self.inner.invalidate_all();
    }

    /// Apply a change event.
    pub async fn apply(&self, event: &ChangeEvent) {
        debug!(?event, "Applying tenant change");
        match event {
            ChangeEvent::Domain { hostname } => self.invalidate_host(hostname).await,
            ChangeEvent::Store { store_id, slug } => {
                self.invalidate_store(*store_id, slug.as_ref());
            }
            ChangeEvent::All => self.invalidate_all(),
        }
        self.inner.run_pending_tasks().await;
    }
}
