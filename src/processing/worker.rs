//! Async wrappers that keep the CPU-bound codec off the async runtime.
//!
//! The codec itself is synchronous. Callers driving a UI or an async main loop
//! hand the work to tokio's blocking pool and await only the final result.

use crate::error::{Result, VaultError};
use crate::processing::container::{ContainerCodec, EncodedContainer};
use crate::processing::raw_image::RawImage;

/// Run [`ContainerCodec::encode`] on the blocking thread pool.
pub async fn encode_in_background(
    codec: ContainerCodec,
    image: RawImage,
    password: String,
) -> Result<EncodedContainer> {
    tokio::task::spawn_blocking(move || codec.encode(&image, &password))
        .await
        .map_err(|e| VaultError::Worker(format!("encode task panicked: {}", e)))?
}

/// Run [`ContainerCodec::decode`] on the blocking thread pool.
pub async fn decode_in_background(
    codec: ContainerCodec,
    container: RawImage,
    password: String,
) -> Result<RawImage> {
    tokio::task::spawn_blocking(move || codec.decode(&container, &password))
        .await
        .map_err(|e| VaultError::Worker(format!("decode task panicked: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_roundtrip() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(6, 4, [9, 99, 199]);

        let encoded = encode_in_background(codec, img.clone(), "pw".to_string())
            .await
            .unwrap();
        let decoded = decode_in_background(codec, encoded.image, "pw".to_string())
            .await
            .unwrap();
        assert_eq!(decoded, img);
    }

    #[tokio::test]
    async fn background_errors_pass_through() {
        let codec = ContainerCodec::new();
        let img = RawImage::filled(6, 4, [0, 0, 0]);
        let result = encode_in_background(codec, img, String::new()).await;
        assert!(matches!(result, Err(VaultError::EmptyPassword)));
    }
}
