//! # Password-Based Key Derivation
//!
//! Stretches a password into a 256-bit key with PBKDF2-HMAC-SHA256.
//!
//! The salt is 16 random bytes drawn from the OS entropy source on every encode and
//! stored in clear at the front of the container payload, so decode can re-derive
//! the same key from the password alone.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes.
pub const KEY_LEN: usize = 32;

/// Default and minimum PBKDF2 round count.
pub const MIN_ITERATIONS: u32 = 100_000;

pub type Salt = [u8; SALT_LEN];

/// A derived key, wiped from memory on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

/// PBKDF2-HMAC-SHA256 key derivation with a fixed round count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation {
    iterations: u32,
}

impl Default for KeyDerivation {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

impl KeyDerivation {
    /// Create a derivation with a custom round count.
    ///
    /// # Errors
    /// [`VaultError::Config`] if `iterations` is below [`MIN_ITERATIONS`].
    pub fn with_iterations(iterations: u32) -> Result<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(VaultError::Config(format!(
                "kdf iterations must be at least {}, got {}",
                MIN_ITERATIONS, iterations
            )));
        }
        Ok(Self { iterations })
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Derive a key from `password`, generating a fresh salt when none is given.
    ///
    /// Returns the key together with the salt actually used.
    ///
    /// # Errors
    /// [`VaultError::EmptyPassword`] for an empty password.
    pub fn derive(&self, password: &[u8], salt: Option<&Salt>) -> Result<(DerivedKey, Salt)> {
        if password.is_empty() {
            return Err(VaultError::EmptyPassword);
        }

        let salt = match salt {
            Some(salt) => *salt,
            None => generate_salt(),
        };

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2_hmac::<Sha256>(password, &salt, self.iterations, &mut *key);

        Ok((key, salt))
    }
}

fn generate_salt() -> Salt {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}
