//! Stored password credentials.
//!
//! Credentials are Argon2id hashes kept in PHC string form
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so the cost parameters
//! travel with each stored hash.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("stored credential is malformed: {0}")]
    Malformed(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Argon2id password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    phc: String,
}

impl Credential {
    /// Hash `password` under a fresh random salt.
    pub fn new(password: &str) -> Result<Self, CredentialError> {
        Self::with_salt(password, *Uuid::new_v4().as_bytes())
    }

    pub fn with_salt(password: &str, salt: [u8; 16]) -> Result<Self, CredentialError> {
        let salt = SaltString::encode_b64(&salt).map_err(|e| CredentialError::Hash(e.to_string()))?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(Self {
            phc: hash.to_string(),
        })
    }

    /// Rebuild a credential from its stored PHC string.
    pub fn from_phc(encoded: &str) -> Result<Self, CredentialError> {
        let parsed = PasswordHash::new(encoded).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        if argon2::Algorithm::try_from(parsed.algorithm).is_err() {
            return Err(CredentialError::Malformed(format!(
                "unsupported algorithm {}",
                parsed.algorithm
            )));
        }
        Ok(Self {
            phc: encoded.to_string(),
        })
    }

    pub fn as_phc(&self) -> &str {
        &self.phc
    }

    /// Constant-time check of `password` against the stored hash.
    pub fn verify(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.phc) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_password_only() {
        let c = Credential::new("correct horse").unwrap();
        assert!(c.verify("correct horse"));
        assert!(!c.verify("correct horse "));
        assert!(!c.verify(""));
    }

    #[test]
    fn hashes_are_argon2id_with_cost_parameters() {
        let c = Credential::new("pw").unwrap();
        assert!(c.as_phc().starts_with("$argon2id$v=19$m="));
        assert!(!c.as_phc().contains("pw$"));
    }

    #[test]
    fn salts_differ_between_derivations() {
        let a = Credential::new("pw").unwrap();
        let b = Credential::new("pw").unwrap();
        assert_ne!(a.as_phc(), b.as_phc());
        assert!(a.verify("pw") && b.verify("pw"));
    }

    #[test]
    fn stored_form_rebuilds_the_same_credential() {
        let c = Credential::with_salt("pw", [7u8; 16]).unwrap();
        let back = Credential::from_phc(c.as_phc()).unwrap();
        assert_eq!(back, c);
        assert!(back.verify("pw"));
        assert!(!back.verify("pw2"));
    }

    #[test]
    fn malformed_or_foreign_hashes_are_rejected() {
        assert!(Credential::from_phc("not a hash").is_err());
        assert!(Credential::from_phc("").is_err());
        // A well-formed PHC string for an algorithm we do not verify.
        assert!(Credential::from_phc("$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").is_err());
    }

    #[test]
    fn debug_output_is_redacted() {
        let c = Credential::new("secret-password").unwrap();
        assert_eq!(format!("{c:?}"), "Credential(<redacted>)");
    }
}
