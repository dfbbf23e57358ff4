//! Strongly-typed identifiers used across the domain.
//!
//! Records are keyed by 12-byte object ids rendered as 24 lowercase hex
//! characters (e.g. `507f1f77bcf86cd799439011`), matching the document store
//! that owns users, profiles and bookings.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Raw 12-byte record identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId([u8; 12]);

impl RecordId {
    pub const LEN: usize = 12;

    /// Generate a new identifier.
    ///
    /// The leading bytes come from a UUIDv7 so ids sort by creation time.
    pub fn generate() -> Self {
        let uuid = Uuid::now_v7();
        let mut bytes = [0u8; Self::LEN];
        bytes.copy_from_slice(&uuid.as_bytes()[..Self::LEN]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::LEN * 2 {
            return Err(DomainError::invalid_id(format!(
                "expected {} hex characters, got {}",
                Self::LEN * 2,
                s.len()
            )));
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| DomainError::invalid_id(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for RecordId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.to_hex()
    }
}

/// Identifier of a user account (customer, chef or admin).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(RecordId);

/// Identifier of a public profile (customer or chef).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(RecordId);

/// Identifier of a booking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(RecordId);

macro_rules! impl_record_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Create a new identifier.
            ///
            /// Prefer passing IDs explicitly in tests for determinism.
            pub fn new() -> Self {
                Self(RecordId::generate())
            }

            pub fn from_record(id: RecordId) -> Self {
                Self(id)
            }

            pub fn as_record(&self) -> &RecordId {
                &self.0
            }
        }

        impl Default for $t {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<RecordId> for $t {
            fn from(value: RecordId) -> Self {
                Self(value)
            }
        }

        impl From<$t> for RecordId {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = RecordId::from_str(s)
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(id))
            }
        }
    };
}

impl_record_newtype!(UserId, "UserId");
impl_record_newtype!(ProfileId, "ProfileId");
impl_record_newtype!(BookingId, "BookingId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_id_hex() {
        let id: UserId = "507f1f77bcf86cd799439011".parse().unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn parse_is_case_insensitive_and_renders_lowercase() {
        let id: BookingId = "507F1F77BCF86CD799439011".parse().unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!("507f1f77".parse::<UserId>().is_err());
        assert!("zzzzzzzzzzzzzzzzzzzzzzzz".parse::<UserId>().is_err());
        assert!("".parse::<ProfileId>().is_err());

        let err = "nope".parse::<ProfileId>().unwrap_err();
        assert!(matches!(&err, DomainError::InvalidId(msg) if msg.starts_with("ProfileId")));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: UserId = "507f1f77bcf86cd799439011".parse().unwrap();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::json!("507f1f77bcf86cd799439011"));

        let back: UserId = serde_json::from_value(json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_rejects_structured_values() {
        let res: Result<UserId, _> = serde_json::from_value(serde_json::json!({ "$gt": "" }));
        assert!(res.is_err());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = UserId::new();
        let b = UserId::new();
        assert_ne!(a, b);
    }
}
