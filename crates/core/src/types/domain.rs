//! Domain binding entity and canonical-domain selection.

use serde::{Deserialize, Serialize};

use super::{DomainBindingId, DomainType, Hostname, StoreId, VerificationStatus};

/// A hostname bound to a store.
///
/// Many bindings may point at one store; each binding points at exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainBinding {
    pub id: DomainBindingId,
    pub store_id: StoreId,
    pub domain_type: DomainType,
    pub domain_name: Hostname,
    /// At most one binding per store and type should be primary; the data
    /// layer does not guarantee it, see [`select_primary`].
    pub is_primary: bool,
    pub verification_status: VerificationStatus,
    /// Soft-disable flag, independent of verification.
    pub is_active: bool,
}

impl DomainBinding {
    /// Whether this binding may route public traffic as a custom domain.
    #[must_use]
    pub fn routes_custom_traffic(&self) -> bool {
        self.domain_type == DomainType::Custom
            && self.verification_status == VerificationStatus::Verified
            && self.is_active
    }
}

/// Pick a store's canonical binding of `domain_type`.
///
/// Only active bindings are candidates. Primary beats non-primary, verified
/// beats unverified, and remaining ties go to the lexicographically smallest
/// domain name so the answer is stable when several bindings claim primary.
#[must_use]
pub fn select_primary(bindings: &[DomainBinding], domain_type: DomainType) -> Option<&DomainBinding> {
    bindings
        .iter()
        .filter(|b| b.is_active && b.domain_type == domain_type)
        .min_by(|a, b| {
            b.is_primary
                .cmp(&a.is_primary)
                .then_with(|| {
                    let a_verified = a.verification_status == VerificationStatus::Verified;
                    let b_verified = b.verification_status == VerificationStatus::Verified;
                    b_verified.cmp(&a_verified)
                })
                .then_with(|| a.domain_name.cmp(&b.domain_name))
        })
}
