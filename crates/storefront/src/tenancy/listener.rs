//! Cache invalidation driven by `PostgreSQL` `LISTEN/NOTIFY`.
//!
//! Triggers on the tenancy tables publish a JSON [`ChangeEvent`] on
//! [`CHANGE_CHANNEL`] whenever a store or binding changes. The listener
//! applies each event to the [`TenantCache`]. Whenever notifications may
//! have been missed (connection lost, unreadable payload) the whole cache
//! is flushed.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tracing::{debug, error, info, warn};

use super::cache::{ChangeEvent, TenantCache};

/// Notification channel used by the tenancy triggers.
pub const CHANGE_CHANNEL: &str = "simpshopy_tenant_changes";

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Apply tenant change notifications to `cache` until the process exits.
///
/// Spawn this on the runtime; it reconnects on its own.
///
/// # Errors
///
/// Returns an error only if the initial `LISTEN` cannot be set up.
pub async fn listen_for_changes(pool: PgPool, cache: TenantCache) -> Result<(), sqlx::Error> {
    let mut listener = PgListener::connect_with(&pool).await?;
    listener.listen(CHANGE_CHANNEL).await?;
    info!(channel = CHANGE_CHANNEL, "Listening for tenant changes");

    loop {
        match listener.try_recv().await {
            Ok(Some(notification)) => handle_payload(&cache, notification.payload()).await,
            Ok(None) => {
                // Connection dropped; PgListener re-subscribes on the next call.
                warn!("Tenant change listener reconnecting, flushing cache");
                cache.invalidate_all();
            }
            Err(e) => {
                error!(error = %e, "Tenant change listener error, flushing cache");
                cache.invalidate_all();
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Apply one notification payload.
pub async fn handle_payload(cache: &TenantCache, payload: &str) {
    match serde_json::from_str::<ChangeEvent>(payload) {
        Ok(event) => {
            debug!(?event, "Tenant change notification");
            cache.apply(&event).await;
        }
        Err(e) => {
            warn!(error = %e, payload, "Unreadable tenant change notification, flushing cache");
            cache.apply(&ChangeEvent::All).await;
        }
    }
}
