//! # Error Types
//!
//! Every failure the vault can report, from the image I/O layer in front of the
//! core down to container parsing and authentication.
//!
//! ## Error Categories
//! - **Input**: missing files, unsupported formats, bad dimensions, empty passwords
//! - **Container**: headers that disagree with the carrier's pixel count
//! - **Authentication**: wrong password *or* corrupted data, deliberately indistinguishable
//! - **Capacity**: canvas growth past a configured limit
//!
//! The core never logs or retries any of these; they all propagate to the caller.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Error)]
pub enum VaultError {
    /// The input path does not exist.
    #[error("file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input is not an image this tool can read.
    #[error("unsupported image format: {0}")]
    UnsupportedImageFormat(String),

    /// The length header disagrees with the carrier's own pixel count.
    #[error(
        "malformed container: header declares {declared} bytes needing {required_pixels} pixels, \
         image has {available_pixels}"
    )]
    MalformedContainer {
        declared: u64,
        required_pixels: u64,
        available_pixels: u64,
    },

    /// Wrong password or tampered container. The two causes are never told apart.
    #[error("wrong password or corrupted file")]
    AuthenticationError,

    /// The carrier would need more pixels than allowed.
    #[error("container needs {required} pixels, limit is {limit}")]
    CapacityOverflow { required: u64, limit: u64 },

    /// The AEAD refused the plaintext (only possible past its length limit).
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("password must not be empty")]
    EmptyPassword,

    /// Pixel buffer does not match the declared dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Serializing pixels into the interchange format failed.
    #[error("image encoding failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A background worker died before returning a result.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl VaultError {
    /// `true` for the two outcomes that mean "this file did not decode with this password".
    ///
    /// Callers that want a single user-facing message can branch on this instead of
    /// matching both variants.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            VaultError::AuthenticationError | VaultError::MalformedContainer { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_message_does_not_leak_cause() {
        let msg = VaultError::AuthenticationError.to_string();
        assert_eq!(msg, "wrong password or corrupted file");
    }

    #[test]
    fn rejection_classification() {
        assert!(VaultError::AuthenticationError.is_rejection());
        assert!(VaultError::MalformedContainer {
            declared: 10,
            required_pixels: 6,
            available_pixels: 4,
        }
        .is_rejection());
        assert!(!VaultError::EmptyPassword.is_rejection());
    }

    #[test]
    fn not_found_shows_path() {
        let err = VaultError::InputNotFound(PathBuf::from("missing/photo.png"));
        assert!(err.to_string().contains("missing/photo.png"));
    }
}
