//! `chefbook-auth`: request authorization and payment-integrity gate.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores are
//! reached through the ports in [`ports`], and the HTTP layer only maps
//! [`GateError`] classes to responses.

pub mod authorize;
pub mod claims;
pub mod credential;
pub mod gate;
pub mod input;
pub mod payment;
pub mod ports;
pub mod principal;
pub mod roles;
pub mod token;

pub use authorize::{AuthzError, Concealment, ResourceKind, ResourceRef, authorize_ownership};
pub use claims::{TokenClaims, TokenValidationError, validate_claims};
pub use credential::{Credential, CredentialError};
pub use gate::{AuthzGate, GateConfig, GateConfigError, GateError, IssuedToken};
pub use input::{FieldValue, InputError, ShapedBody, reject_injection_operators};
pub use payment::{PaymentAssertion, PaymentError, PaymentVerifier};
pub use ports::{OwnershipStore, StoreError, UserDirectory, UserRecord, normalize_email};
pub use principal::Principal;
pub use roles::Role;
pub use token::{Hs256JwtCodec, JwtIssuer, JwtValidator, TokenError};
