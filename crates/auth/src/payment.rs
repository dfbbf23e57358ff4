//! Payment callback signature verification.
//!
//! The gateway signs `order_id + "|" + payment_id` with HMAC-SHA256 under a
//! shared secret and hands the hex digest to the client, which relays it to
//! us. We recompute, hex-encode, and compare the strings in constant time:
//! only the exact lowercase hex the gateway emits is accepted.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment secret must not be empty")]
    EmptySecret,

    #[error("payment assertion is missing a field")]
    MissingField,

    #[error("payment signature mismatch")]
    Mismatch,
}

/// Externally supplied proof that a payment succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAssertion {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Shared-secret HMAC verifier for payment assertions.
#[derive(Clone)]
pub struct PaymentVerifier {
    keyed: HmacSha256,
}

impl PaymentVerifier {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, PaymentError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(PaymentError::EmptySecret);
        }
        let keyed = HmacSha256::new_from_slice(secret)
            .map_err(|_| PaymentError::EmptySecret)?;
        Ok(Self { keyed })
    }

    /// Hex-encoded signature the gateway would produce for this pair.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        hex::encode(self.digest(order_id, payment_id))
    }

    pub fn verify(&self, assertion: &PaymentAssertion) -> Result<(), PaymentError> {
        self.verify_fields(&assertion.order_id, &assertion.payment_id, &assertion.signature)
    }

    pub fn verify_fields(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), PaymentError> {
        if order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
            return Err(PaymentError::MissingField);
        }

        let expected = hex::encode(self.digest(order_id, payment_id));

        // `ct_eq` on slices of unequal length returns false without
        // inspecting contents.
        if bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            Ok(())
        } else {
            Err(PaymentError::Mismatch)
        }
    }

    fn digest(&self, order_id: &str, payment_id: &str) -> [u8; 32] {
        let mut mac = self.keyed.clone();
        mac.update(order_id.as_bytes());
        mac.update(b"|");
        mac.update(payment_id.as_bytes());

        let mut out = [0u8; 32];
        out.copy_from_slice(&mac.finalize().into_bytes());
        out
    }
}

impl core::fmt::Debug for PaymentVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PaymentVerifier").finish_non_exhaustive()
    }
}
