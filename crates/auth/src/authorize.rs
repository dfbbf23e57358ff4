//! Resource ownership policy.
//!
//! - No IO (the owner is looked up by the gate and passed in)
//! - No panics
//! - No business logic (pure policy check)

use serde::Serialize;
use thiserror::Error;

use chefbook_core::{BookingId, ProfileId, RecordId, UserId};

use crate::Principal;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden")]
    Forbidden,

    #[error("resource not found")]
    ResourceNotFound,
}

/// How an ownership mismatch is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Concealment {
    /// The resource is publicly discoverable; a mismatch is `Forbidden`.
    Disclose,
    /// Existence must not leak; a mismatch looks exactly like a missing resource.
    Conceal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Profile,
    Booking,
}

impl ResourceKind {
    /// Profiles are listed publicly; bookings are private to their owner.
    pub fn concealment(self) -> Concealment {
        match self {
            ResourceKind::Profile => Concealment::Disclose,
            ResourceKind::Booking => Concealment::Conceal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Profile => "profile",
            ResourceKind::Booking => "booking",
        }
    }
}

/// A resource whose mutation is gated on ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceRef {
    Profile(ProfileId),
    Booking(BookingId),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Profile(_) => ResourceKind::Profile,
            ResourceRef::Booking(_) => ResourceKind::Booking,
        }
    }

    pub fn record_id(&self) -> RecordId {
        match self {
            ResourceRef::Profile(id) => RecordId::from(*id),
            ResourceRef::Booking(id) => RecordId::from(*id),
        }
    }
}

impl core::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.kind().as_str(), self.record_id())
    }
}

/// Decide whether `principal` may mutate `resource`, given its recorded owner.
///
/// `owner` is `None` when the resource does not exist. The administrative
/// capability must be carried explicitly by the principal; a non-admin is
/// allowed only on exact subject equality.
pub fn authorize_ownership(
    principal: &Principal,
    resource: &ResourceRef,
    owner: Option<UserId>,
) -> Result<(), AuthzError> {
    let Some(owner) = owner else {
        return Err(AuthzError::ResourceNotFound);
    };

    if principal.subject == owner || principal.is_admin() {
        return Ok(());
    }

    match resource.kind().concealment() {
        Concealment::Disclose => Err(AuthzError::Forbidden),
        Concealment::Conceal => Err(AuthzError::ResourceNotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use chrono::{Duration, Utc};
    use proptest::prelude::*;

    fn principal(subject: UserId, roles: Vec<Role>) -> Principal {
        let now = Utc::now();
        Principal {
            subject,
            roles,
            issued_at: now,
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn owner_is_allowed() {
        let me = UserId::new();
        let p = principal(me, vec![Role::new(Role::CUSTOMER)]);
        let profile = ResourceRef::Profile(ProfileId::new());
        assert_eq!(authorize_ownership(&p, &profile, Some(me)), Ok(()));
    }

    #[test]
    fn profile_mismatch_is_forbidden() {
        let p = principal(UserId::new(), vec![Role::new(Role::CHEF)]);
        let profile = ResourceRef::Profile(ProfileId::new());
        assert_eq!(
            authorize_ownership(&p, &profile, Some(UserId::new())),
            Err(AuthzError::Forbidden)
        );
    }

    #[test]
    fn booking_mismatch_is_concealed() {
        let p = principal(UserId::new(), vec![Role::new(Role::CUSTOMER)]);
        let booking = ResourceRef::Booking(BookingId::new());
        assert_eq!(
            authorize_ownership(&p, &booking, Some(UserId::new())),
            Err(AuthzError::ResourceNotFound)
        );
    }

    #[test]
    fn missing_resource_is_not_found_even_for_admin() {
        let p = principal(UserId::new(), vec![Role::admin()]);
        let profile = ResourceRef::Profile(ProfileId::new());
        assert_eq!(
            authorize_ownership(&p, &profile, None),
            Err(AuthzError::ResourceNotFound)
        );
    }

    #[test]
    fn admin_capability_allows_foreign_resources() {
        let p = principal(UserId::new(), vec![Role::new(Role::CHEF), Role::admin()]);
        let booking = ResourceRef::Booking(BookingId::new());
        assert_eq!(authorize_ownership(&p, &booking, Some(UserId::new())), Ok(()));
    }

    #[test]
    fn role_names_resembling_admin_grant_nothing() {
        let p = principal(UserId::new(), vec![Role::new("Admin"), Role::new("admin ")]);
        let profile = ResourceRef::Profile(ProfileId::new());
        assert_eq!(
            authorize_ownership(&p, &profile, Some(UserId::new())),
            Err(AuthzError::Forbidden)
        );
    }

    proptest! {
        #[test]
        fn non_owners_are_always_rejected(
            subject in proptest::array::uniform12(any::<u8>()),
            owner in proptest::array::uniform12(any::<u8>()),
            booking in any::<bool>(),
        ) {
            prop_assume!(subject != owner);
            let p = principal(UserId::from_record(RecordId::from_bytes(subject)), vec![Role::new(Role::CUSTOMER)]);
            let resource = if booking {
                ResourceRef::Booking(BookingId::new())
            } else {
                ResourceRef::Profile(ProfileId::new())
            };
            let owner = UserId::from_record(RecordId::from_bytes(owner));
            prop_assert!(authorize_ownership(&p, &resource, Some(owner)).is_err());
        }
    }
}
