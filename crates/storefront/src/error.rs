//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::tenancy::{IntegrityIssue, StoreError};

/// Seconds clients should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "5";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// No store matches the request's address.
    #[error("Store not found")]
    StoreNotFound,

    /// A binding matched but the tenant data is inconsistent.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(IntegrityIssue),

    /// The tenant store could not be reached.
    #[error("Tenant lookup failed: {0}")]
    Unavailable(#[from] StoreError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authorized.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Server errors not already reported where they arose. Integrity issues
    /// are logged by the resolver with the offending address.
    const fn reports_to_sentry(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.reports_to_sentry() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::StoreNotFound | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) | Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::StoreUnavailable(_) => "Store temporarily unavailable".to_string(),
            Self::Unavailable(_) => "Service temporarily unavailable".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        let mut response = (status, message).into_response();
        if matches!(self, Self::Unavailable(_)) {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Tag the current Sentry scope with the resolved store.
pub fn set_sentry_store(slug: &str) {
    sentry::configure_scope(|scope| {
        scope.set_tag("store", slug);
    });
}
