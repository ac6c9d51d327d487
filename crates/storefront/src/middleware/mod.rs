//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Tenant resolution (storefront routes only)

pub mod request_id;
pub mod tenant;

pub use request_id::request_id_middleware;
pub use tenant::{CurrentTenancy, RequireStore, Tenancy, resolve_tenant};
