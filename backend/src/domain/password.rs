//! Salted password digests for stored credentials.
//!
//! Stored form is `<salt-hex>$<digest-hex>` where the digest is
//! SHA-256 over `salt || password`. Verification is constant-shape: both
//! sides recompute the digest and compare the hex encodings.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const SEPARATOR: char = '$';

/// Errors raised when decoding a stored password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The stored value did not match the `salt$digest` layout.
    #[error("stored password hash is malformed")]
    Malformed,
}

/// Salted SHA-256 digest of a password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    /// Hash a freshly supplied password with a random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let salt = hex::encode(salt);
        let digest = digest_hex(&salt, password);
        Self { salt, digest }
    }

    /// Decode a hash from its stored `salt$digest` form.
    pub fn parse(stored: &str) -> Result<Self, PasswordHashError> {
        let (salt, digest) = stored
            .split_once(SEPARATOR)
            .ok_or(PasswordHashError::Malformed)?;
        if salt.is_empty() || digest.is_empty() {
            return Err(PasswordHashError::Malformed);
        }
        Ok(Self {
            salt: salt.to_owned(),
            digest: digest.to_owned(),
        })
    }

    /// Check a candidate password against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        digest_hex(&self.salt, password) == self.digest
    }

    /// Encode the hash into its stored form.
    pub fn to_stored(&self) -> String {
        format!("{}{SEPARATOR}{}", self.salt, self.digest)
    }
}

fn digest_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for hashing and the stored encoding.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn verifies_matching_password() {
        let hash = PasswordHash::derive("hunter2");
        assert!(hash.verify("hunter2"));
        assert!(!hash.verify("hunter3"));
    }

    #[rstest]
    fn round_trips_through_stored_form() {
        let hash = PasswordHash::derive("hunter2");
        let restored = PasswordHash::parse(&hash.to_stored()).expect("parses");
        assert!(restored.verify("hunter2"));
    }

    #[rstest]
    fn salts_differ_between_derivations() {
        let first = PasswordHash::derive("hunter2");
        let second = PasswordHash::derive("hunter2");
        assert_ne!(first.to_stored(), second.to_stored());
    }

    #[rstest]
    #[case("")]
    #[case("no-separator")]
    #[case("$digestonly")]
    #[case("saltonly$")]
    fn rejects_malformed_stored_values(#[case] stored: &str) {
        assert_eq!(
            PasswordHash::parse(stored).expect_err("should reject"),
            PasswordHashError::Malformed
        );
    }
}
