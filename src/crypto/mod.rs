//! # Cryptography
//!
//! - [`kdf`]: PBKDF2-HMAC-SHA256 password stretching with a random 16-byte salt
//! - [`cipher`]: `XChaCha20-Poly1305` tokens that carry their own nonce

pub mod cipher;
pub mod kdf;

pub use cipher::AuthenticatedCipher;
pub use kdf::{DerivedKey, KeyDerivation, Salt, SALT_LEN};
