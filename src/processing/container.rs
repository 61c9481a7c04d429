//! # Container Codec
//!
//! Ties key derivation, authenticated encryption and pixel packing together.
//!
//! ## Encode
//! 1. Serialize the secret image to PNG (or a dimension record if it has no pixels)
//! 2. Derive a key from the password with a fresh random salt
//! 3. Encrypt the PNG bytes into a token
//! 4. Pack `salt ++ token` into a carrier the size of the input (grown if needed),
//!    padding the rest with decoy noise
//!
//! ## Decode
//! 1. Unpack the payload using the length header
//! 2. Split off the salt and re-derive the key
//! 3. Verify and decrypt the token
//! 4. Parse the serialized image back into pixels
//!
//! A failure in step 3 or step 4 of decode is reported as the same
//! [`VaultError::AuthenticationError`], so callers cannot tell a wrong password from
//! a corrupted file.

use base64::{engine::general_purpose, Engine as _};
use log::debug;

use crate::crypto::kdf::{Salt, SALT_LEN};
use crate::crypto::{AuthenticatedCipher, KeyDerivation};
use crate::error::{Result, VaultError};
use crate::processing::decoy::DecoyGenerator;
use crate::processing::packer::{required_pixels, PixelPacker};
use crate::processing::raw_image::RawImage;

/// Result of an encode: the carrier image and the salt embedded in it.
///
/// The salt is not secret and is already inside `image`; it is exposed for logging
/// and tests only.
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    pub image: RawImage,
    pub salt: Salt,
}

/// Encrypts images into noise-looking carriers and back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerCodec {
    kdf: KeyDerivation,
    cipher: AuthenticatedCipher,
    packer: PixelPacker,
}

impl ContainerCodec {
    /// Codec with default KDF rounds and unbounded canvas growth.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parts(kdf: KeyDerivation, packer: PixelPacker) -> Self {
        Self {
            kdf,
            cipher: AuthenticatedCipher::new(),
            packer,
        }
    }

    pub fn kdf(&self) -> &KeyDerivation {
        &self.kdf
    }

    pub fn packer(&self) -> &PixelPacker {
        &self.packer
    }

    /// Hide `image` in a new carrier protected by `password`.
    ///
    /// # Errors
    /// - [`VaultError::EmptyPassword`] for an empty password
    /// - [`VaultError::Encode`] if the image cannot be serialized
    /// - [`VaultError::CapacityOverflow`] if the carrier would exceed the packer's limit
    pub fn encode(&self, image: &RawImage, password: &str) -> Result<EncodedContainer> {
        if password.is_empty() {
            return Err(VaultError::EmptyPassword);
        }

        let plaintext = image.to_interchange_bytes()?;
        debug!(
            "Serialized {}x{} image to {} bytes",
            image.width(),
            image.height(),
            plaintext.len()
        );

        let (key, salt) = self.kdf.derive(password.as_bytes(), None)?;
        let token = self.cipher.encrypt(&key, &plaintext)?;

        let mut payload = Vec::with_capacity(SALT_LEN + token.len());
        payload.extend_from_slice(&salt);
        payload.extend_from_slice(&token);
        debug!(
            "Payload {} bytes (salt {})",
            payload.len(),
            general_purpose::STANDARD.encode(salt)
        );

        let mut decoy = DecoyGenerator::new();
        let carrier = self
            .packer
            .pack(&payload, image.width(), image.height(), &mut decoy)?;

        Ok(EncodedContainer {
            image: carrier,
            salt,
        })
    }

    /// Recover the image hidden in `container`.
    ///
    /// # Errors
    /// - [`VaultError::EmptyPassword`] for an empty password
    /// - [`VaultError::MalformedContainer`] if the header does not fit the image or
    ///   the payload is shorter than a salt
    /// - [`VaultError::AuthenticationError`] for a wrong password or corrupted data
    pub fn decode(&self, container: &RawImage, password: &str) -> Result<RawImage> {
        if password.is_empty() {
            return Err(VaultError::EmptyPassword);
        }

        let payload = self.packer.unpack(container)?;
        if payload.len() < SALT_LEN {
            return Err(VaultError::MalformedContainer {
                declared: payload.len() as u64,
                required_pixels: required_pixels(SALT_LEN as u64),
                available_pixels: container.pixel_count(),
            });
        }

        let (salt_bytes, token) = payload.split_at(SALT_LEN);
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(salt_bytes);

        let (key, _) = self.kdf.derive(password.as_bytes(), Some(&salt))?;
        let plaintext = self.cipher.decrypt(&key, token)?;

        // Authenticated bytes that are not an image still mean the wrong key was in play.
        RawImage::from_interchange_bytes(&plaintext)
            .map_err(|_| VaultError::AuthenticationError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_ten_by_ten_scenario() {
        let codec = ContainerCodec::new();
        let white = RawImage::filled(10, 10, [255, 255, 255]);

        let encoded = codec.encode(&white, "test123").unwrap();
        assert_eq!(encoded.image.pixel_count(), 100);

        assert_eq!(codec.decode(&encoded.image, "test123").unwrap(), white);
        assert!(matches!(
            codec.decode(&encoded.image, "wrong"),
            Err(VaultError::AuthenticationError)
        ));
    }

    #[test]
    fn salt_is_embedded_after_header() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(10, 10, [0, 0, 0]);
        let encoded = codec.encode(&img, "pw").unwrap();
        assert_eq!(&encoded.image.as_bytes()[6..6 + SALT_LEN], &encoded.salt);
    }

    #[test]
    fn tiny_image_grows_canvas() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(1, 1, [12, 34, 56]);

        let encoded = codec.encode(&img, "pw").unwrap();
        assert!(encoded.image.pixel_count() > 1);
        assert_eq!(codec.decode(&encoded.image, "pw").unwrap(), img);
    }

    #[test]
    fn zero_area_images_roundtrip() {
        let codec = ContainerCodec::new();
        for (w, h) in [(0, 0), (0, 5), (7, 0)] {
            let img = RawImage::new(w, h, Vec::new()).unwrap();
            let encoded = codec.encode(&img, "pw").unwrap();
            assert!(encoded.image.width() > 0 && encoded.image.height() > 0);
            assert_eq!(codec.decode(&encoded.image, "pw").unwrap(), img, "{}x{}", w, h);
        }
    }

    #[test]
    fn empty_password_rejected() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(4, 4, [0, 0, 0]);
        assert!(matches!(codec.encode(&img, ""), Err(VaultError::EmptyPassword)));
        assert!(matches!(codec.decode(&img, ""), Err(VaultError::EmptyPassword)));
    }

    #[test]
    fn payload_shorter_than_salt_is_malformed() {
        let codec = ContainerCodec::new();
        let mut img = RawImage::filled(10, 10, [0, 0, 0]);
        img.as_bytes_mut()[..4].copy_from_slice(&10u32.to_be_bytes());
        assert!(matches!(
            codec.decode(&img, "pw"),
            Err(VaultError::MalformedContainer { declared: 10, .. })
        ));
    }

    #[test]
    fn plain_photo_is_rejected() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(10, 10, [255, 255, 255]);
        assert!(codec.decode(&img, "pw").unwrap_err().is_rejection());
    }
}
