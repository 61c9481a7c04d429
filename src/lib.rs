//! # decoy-vault
//!
//! Hides an encrypted image inside a carrier picture that looks like RGB noise.
//!
//! The secret image is serialized to PNG, encrypted with `XChaCha20-Poly1305`
//! under a PBKDF2-HMAC-SHA256 key, and the salt plus ciphertext are packed
//! straight into the carrier's pixels behind a 2-pixel length header. Unused
//! pixels are filled with fresh random noise.
//!
//! ```rust,ignore
//! use decoy_vault::{ContainerCodec, RawImage};
//!
//! let codec = ContainerCodec::new();
//! let secret = RawImage::filled(10, 10, [255, 255, 255]);
//! let carrier = codec.encode(&secret, "test123")?;
//! assert_eq!(codec.decode(&carrier.image, "test123")?, secret);
//! ```

pub mod common;
pub mod crypto;
pub mod error;
pub mod processing;
pub mod utils;

pub use error::{Result, VaultError};
pub use processing::{looks_like_container, ContainerCodec, EncodedContainer, RawImage};
