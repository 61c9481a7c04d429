//! Authenticated encryption of opaque payloads using `XChaCha20-Poly1305`.
//!
//! Token layout:
//!
//! ```text
//! [version: 1][nonce: 24][ciphertext ...][tag: 16]
//! ```
//!
//! The version byte is bound as associated data, so it cannot be swapped without
//! failing authentication. Nonces are drawn from the OS random source per call; the
//! 192-bit nonce space makes random nonces safe without any counter state.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::kdf::KEY_LEN;
use crate::error::{Result, VaultError};

/// Current token format version.
pub const TOKEN_VERSION: u8 = 0x01;

/// `XChaCha20` nonce length in bytes.
pub const NONCE_LEN: usize = 24;

/// Poly1305 tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Bytes a token adds on top of the plaintext.
pub const TOKEN_OVERHEAD: usize = 1 + NONCE_LEN + TAG_LEN;

/// Stateless AEAD wrapper. Holds no keys between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthenticatedCipher;

impl AuthenticatedCipher {
    pub fn new() -> Self {
        Self
    }

    /// Encrypt `plaintext`, returning a self-contained token.
    pub fn encrypt(&self, key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
        let aad = [TOKEN_VERSION];
        let sealed = cipher
            .encrypt(
                XNonce::from_slice(&nonce),
                Payload {
                    msg: plaintext,
                    aad: &aad,
                },
            )
            // Only reachable for plaintexts beyond the cipher's 256 GiB limit.
            .map_err(|_| VaultError::EncryptionFailed)?;

        let mut token = Vec::with_capacity(TOKEN_OVERHEAD + plaintext.len());
        token.push(TOKEN_VERSION);
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&sealed);
        Ok(token)
    }

    /// Verify and decrypt a token produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    /// [`VaultError::AuthenticationError`] for a wrong key, any modified bit, a
    /// truncated token or an unknown version.
    pub fn decrypt(&self, key: &[u8; KEY_LEN], token: &[u8]) -> Result<Vec<u8>> {
        if token.len() < TOKEN_OVERHEAD || token[0] != TOKEN_VERSION {
            return Err(VaultError::AuthenticationError);
        }

        let (nonce, sealed) = token[1..].split_at(NONCE_LEN);
        let cipher = XChaCha20Poly1305::new(Key::from_slice(key));
        let aad = [TOKEN_VERSION];

        cipher
            .decrypt(
                XNonce::from_slice(nonce),
                Payload {
                    msg: sealed,
                    aad: &aad,
                },
            )
            .map_err(|_| VaultError::AuthenticationError)
    }
}
