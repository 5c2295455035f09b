//! Salted password hashing
//!
//! PBKDF2-HMAC-SHA256 from `ring`. Hashes are stored as
//! `pbkdf2-sha256$<iterations>$<salt>$<hash>` (unpadded standard base64) so a
//! hash keeps verifying after the configured work factor changes.

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use ring::pbkdf2;
use ring::error::Unspecified;
use ring::rand::{SecureRandom, SystemRandom};
use std::fmt;
use std::num::NonZeroU32;
use std::sync::OnceLock;

use super::errors::CredentialError;

/// Default PBKDF2 iteration count (OWASP baseline for HMAC-SHA256)
pub const DEFAULT_HASH_ITERATIONS: u32 = 600_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = ring::digest::SHA256_OUTPUT_LEN;

/// Encoded one-way password hash
///
/// `Debug` never prints the encoded value.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already encoded hash
    #[must_use]
    pub const fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iteration count recorded in the hash, if it parses
    #[must_use]
    pub fn iterations(&self) -> Option<u32> {
        self.parts().map(|parts| parts.iterations.get())
    }

    fn parts(&self) -> Option<HashParts> {
        let mut fields = self.0.split('$');
        let scheme = fields.next()?;
        let iterations = fields.next()?.parse::<NonZeroU32>().ok()?;
        let salt = STANDARD_NO_PAD.decode(fields.next()?).ok()?;
        let hash = STANDARD_NO_PAD.decode(fields.next()?).ok()?;
        if scheme != SCHEME || fields.next().is_some() || hash.len() != HASH_BYTES {
            return None;
        }
        Some(HashParts {
            iterations,
            salt,
            hash,
        })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

struct HashParts {
    iterations: NonZeroU32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

/// Source of password salts
pub trait SaltSource: fmt::Debug + Send + Sync {
    /// Fill `dest` with unpredictable bytes
    ///
    /// # Errors
    ///
    /// Returns [`Unspecified`] if no randomness is available
    fn fill(&self, dest: &mut [u8]) -> Result<(), Unspecified>;
}

impl SaltSource for SystemRandom {
    fn fill(&self, dest: &mut [u8]) -> Result<(), Unspecified> {
        SecureRandom::fill(self, dest)
    }
}

/// Hashes and verifies passwords with a configurable work factor
#[derive(Debug)]
pub struct PasswordHasher {
    iterations: NonZeroU32,
    salts: Box<dyn SaltSource>,
    // Hash verified against when the email is unknown, so both login
    // failures cost one full derivation.
    decoy: OnceLock<PasswordHash>,
}

impl PasswordHasher {
    /// Create a hasher using `iterations` rounds for new hashes
    ///
    /// # Errors
    ///
    /// Returns an error if `iterations` is zero
    pub fn new(iterations: u32) -> Result<Self> {
        Self::with_salt_source(iterations, Box::new(SystemRandom::new()))
    }

    /// Create a hasher drawing salts from `salts` instead of the system RNG
    ///
    /// # Errors
    ///
    /// Returns an error if `iterations` is zero
    pub fn with_salt_source(iterations: u32, salts: Box<dyn SaltSource>) -> Result<Self> {
        let iterations = NonZeroU32::new(iterations)
            .ok_or_else(|| anyhow!("Password hash iterations must be greater than zero"))?;
        Ok(Self {
            iterations,
            salts,
            decoy: OnceLock::new(),
        })
    }

    /// Work factor applied to new hashes
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        self.iterations.get()
    }

    /// Hash a password with a fresh random salt
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::HashingFailed`] if the salt source is
    /// unavailable
    pub fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let mut salt = [0u8; SALT_BYTES];
        self.salts.fill(&mut salt).map_err(|_| {
            log::error!("Random source failed while salting a password");
            CredentialError::HashingFailed
        })?;
        Ok(self.derive(password, &salt))
    }

    /// Check a password against a stored hash in constant time
    ///
    /// Uses the iteration count recorded in the hash. A malformed hash never
    /// verifies.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &PasswordHash) -> bool {
        let Some(parts) = stored.parts() else {
            log::warn!("Stored password hash is malformed");
            return false;
        };
        pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            parts.iterations,
            &parts.salt,
            password.as_bytes(),
            &parts.hash,
        )
        .is_ok()
    }

    /// Spend the same effort as a real verification, then fail
    pub fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy
            .get_or_init(|| self.derive("decoy password", &[0u8; SALT_BYTES]));
        let _ = self.verify(password, decoy);
    }

    fn derive(&self, password: &str, salt: &[u8]) -> PasswordHash {
        let mut hash = [0u8; HASH_BYTES];
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            self.iterations,
            salt,
            password.as_bytes(),
            &mut hash,
        );
        PasswordHash(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(hash)
        ))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: NonZeroU32::new(DEFAULT_HASH_ITERATIONS).unwrap_or(NonZeroU32::MIN),
            salts: Box::new(SystemRandom::new()),
            decoy: OnceLock::new(),
        }
    }
}
