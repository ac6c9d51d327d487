//! Resolution result types.

use std::fmt;

use serde::Serialize;
use simpshopy_core::{Product, StoreId, StoreStatus, StoreTenant};

/// Outcome of resolving one request's hostname and path.
///
/// Every expected condition is a variant; resolution never fails with an
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Platform root, `www` alias, admin console or a development host.
    MainPlatform,
    /// A legacy admin-host store link; send the client to `location`.
    Redirect { location: String },
    /// The request belongs to a tenant store.
    Store(Box<StoreContext>),
    /// No store matches this address.
    NotFound,
    /// A binding matched but the data around it is inconsistent.
    AmbiguousOrUnverified { issue: IntegrityIssue },
    /// A lookup could not be completed; the caller may retry.
    TransientError { reason: String },
}

impl Resolution {
    /// Short, stable label for logs and metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MainPlatform => "main_platform",
            Self::Redirect { .. } => "redirect",
            Self::Store(_) => "store",
            Self::NotFound => "not_found",
            Self::AmbiguousOrUnverified { .. } => "ambiguous_or_unverified",
            Self::TransientError { .. } => "transient_error",
        }
    }

    /// The resolved store context, if any.
    #[must_use]
    pub fn store(&self) -> Option<&StoreContext> {
        match self {
            Self::Store(context) => Some(context),
            _ => None,
        }
    }
}

/// Which rule matched the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchedBy {
    CustomDomain,
    Subdomain,
    StorePath,
}

/// A resolved tenant together with its active catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreContext {
    pub store: StoreTenant,
    pub products: Vec<Product>,
    /// Set when the catalog could not be loaded; `products` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_warning: Option<String>,
    pub matched_by: MatchedBy,
}

/// Data-integrity problems that make a matching binding unusable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    /// More than one active, verified custom binding claims the hostname.
    DuplicateVerifiedBindings { count: usize },
    /// The bound store exists but is not active.
    InactiveStore { store_id: StoreId, status: StoreStatus },
    /// The binding points at a store that does not exist (or failed validation).
    MissingStore { store_id: StoreId },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateVerifiedBindings { count } => {
                write!(f, "{count} active verified bindings share this hostname")
            }
            Self::InactiveStore { store_id, status } => {
                write!(f, "bound store {store_id} is {status}")
            }
            Self::MissingStore { store_id } => write!(f, "bound store {store_id} does not exist"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_serializes_with_kind_tag() {
        let json = serde_json::to_value(Resolution::Redirect {
            location: "https://platform.tld/store/acme".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "redirect");
        assert_eq!(json["location"], "https://platform.tld/store/acme");

        let json = serde_json::to_value(Resolution::AmbiguousOrUnverified {
            issue: IntegrityIssue::DuplicateVerifiedBindings { count: 2 },
        })
        .unwrap();
        assert_eq!(json["issue"]["issue"], "duplicate_verified_bindings");
        assert_eq!(json["issue"]["count"], 2);
    }

    #[test]
    fn test_integrity_issue_display() {
        let issue = IntegrityIssue::InactiveStore {
            store_id: StoreId::new(uuid::Uuid::nil()),
            status: StoreStatus::Suspended,
        };
        assert_eq!(
            issue.to_string(),
            "bound store 00000000-0000-0000-0000-000000000000 is suspended"
        );
    }
}
