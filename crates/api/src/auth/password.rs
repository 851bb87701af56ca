//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself.
//!
//! An optional pepper is appended to the plaintext before hashing; it lives
//! in configuration, never in the database.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Hashing cost profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashCost {
    /// Argon2 default parameters.
    Production,
    /// Smallest parameters Argon2 accepts.
    Minimal,
}

impl HashCost {
    fn argon2(self) -> Result<Argon2<'static>, argon2::password_hash::Error> {
        match self {
            Self::Production => Ok(Argon2::default()),
            Self::Minimal => {
                let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, 1, None)?;
                Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
            }
        }
    }
}

/// Turns plaintext secrets into digests and checks them.
pub trait SecretHasher: Send + Sync + std::fmt::Debug {
    fn hash(&self, plaintext: &str) -> Result<String, argon2::password_hash::Error>;

    /// `Ok(false)` on mismatch; `Err` only for malformed digests.
    fn compare(&self, plaintext: &str, digest: &str)
        -> Result<bool, argon2::password_hash::Error>;
}

/// Argon2id [`SecretHasher`] with an optional pepper.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    pepper: String,
    cost: HashCost,
}

impl Argon2Hasher {
    pub fn new(pepper: impl Into<String>, cost: HashCost) -> Self {
        Self {
            pepper: pepper.into(),
            cost,
        }
    }

    fn peppered(&self, plaintext: &str) -> String {
        format!("{plaintext}{}", self.pepper)
    }
}

impl SecretHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, argon2::password_hash::Error> {
        hash_password(&self.peppered(plaintext), self.cost)
    }

    fn compare(
        &self,
        plaintext: &str,
        digest: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        verify_password(&self.peppered(plaintext), digest)
    }
}

/// Hash a plaintext password using Argon2id with a random salt.
///
/// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
pub fn hash_password(password: &str, cost: HashCost) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = cost.argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted Argon2id hash.
///
/// The cost parameters are read from the hash itself. Returns `Ok(true)` if
/// the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, HashCost::Minimal).expect("hashing should succeed");

        // The hash must be a valid PHC string starting with the argon2id identifier.
        assert!(
            hash.starts_with("$argon2id$"),
            "expected argon2id PHC prefix"
        );

        let verified = verify_password(password, &hash).expect("verify should succeed");
        assert!(verified, "correct password should verify as true");
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("real-password", HashCost::Minimal).expect("hashing should succeed");
        let verified = verify_password("wrong-password", &hash).expect("verify should succeed");
        assert!(!verified, "wrong password should verify as false");
    }

    #[test]
    fn test_malformed_digest_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_pepper_is_part_of_the_secret() {
        let peppered = Argon2Hasher::new("pepper-a", HashCost::Minimal);
        let other = Argon2Hasher::new("pepper-b", HashCost::Minimal);

        let digest = peppered.hash("123456").unwrap();
        assert!(peppered.compare("123456", &digest).unwrap());
        assert!(!other.compare("123456", &digest).unwrap());
        assert!(!verify_password("123456", &digest).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new("", HashCost::Minimal);
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }
}
