//! # Image Files
//!
//! The path-based layer in front of the codec: reading pictures from disk in any
//! supported format, writing containers and recovered images as PNG, and picking
//! output names.
//!
//! Containers must only ever be stored losslessly. A JPEG re-encode would scramble
//! the header and payload pixels, so [`save_png`] writes PNG regardless of the
//! extension it is given.

use base64::{engine::general_purpose, Engine as _};
use image::{GenericImageView, ImageFormat};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::common::config::OutputConfig;
use crate::crypto::kdf::Salt;
use crate::error::{Result, VaultError};
use crate::processing::container::ContainerCodec;
use crate::processing::raw_image::RawImage;

/// Extensions accepted as input, lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "tif"];

/// `true` if `path` has one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive).
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Load an image from disk, normalizing it to 8-bit RGB.
///
/// # Errors
/// - [`VaultError::InputNotFound`] if nothing exists at `path`
/// - [`VaultError::UnsupportedImageFormat`] for an unknown extension or a file the
///   decoder rejects
pub fn load_image(path: impl AsRef<Path>) -> Result<RawImage> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(VaultError::InputNotFound(path.to_path_buf()));
    }
    if !is_supported(path) {
        return Err(VaultError::UnsupportedImageFormat(format!(
            "{} (supported: {})",
            path.display(),
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let img = image::open(path)
        .map_err(|e| VaultError::UnsupportedImageFormat(format!("{}: {}", path.display(), e)))?;
    let (width, height) = img.dimensions();
    debug!(
        "Loaded {} ({:?}, {}x{})",
        path.display(),
        img.color(),
        width,
        height
    );
    Ok(RawImage::from_dynamic(img))
}

/// Write `image` to `path` as PNG.
pub fn save_png(image: &RawImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if !is_png {
        warn!(
            "⚠️  {} does not end in .png; writing PNG data anyway",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image
        .to_rgb_image()?
        .save_with_format(path, ImageFormat::Png)
        .map_err(VaultError::Encode)
}

fn stem_of(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// `dir/photo.jpg` -> `dir/photo<suffix>.png`.
pub fn encrypted_output_path(input: &Path, encrypted_suffix: &str) -> PathBuf {
    let name = format!("{}{}.png", stem_of(input), encrypted_suffix);
    input.with_file_name(name)
}

/// `dir/photo_encrypted.png` -> `dir/photo_decrypted.png`; any other name gets the
/// decrypted suffix appended.
pub fn decrypted_output_path(
    input: &Path,
    encrypted_suffix: &str,
    decrypted_suffix: &str,
) -> PathBuf {
    let stem = stem_of(input);
    let base = stem.strip_suffix(encrypted_suffix).unwrap_or(&stem);
    input.with_file_name(format!("{}{}.png", base, decrypted_suffix))
}

/// Encrypt the picture at `input` into a container written to `output` (or the
/// default name next to the input).
///
/// Returns the written path and the embedded salt.
pub fn encrypt_file(
    codec: &ContainerCodec,
    naming: &OutputConfig,
    input: &Path,
    password: &str,
    output: Option<&Path>,
) -> Result<(PathBuf, Salt)> {
    let image = load_image(input)?;
    let encoded = codec.encode(&image, password)?;

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| encrypted_output_path(input, &naming.encrypted_suffix));
    save_png(&encoded.image, &output)?;

    debug!(
        "Wrote container {} with salt {}",
        output.display(),
        general_purpose::STANDARD.encode(encoded.salt)
    );
    Ok((output, encoded.salt))
}

/// Recover the picture hidden in the container at `input`.
pub fn decrypt_file(
    codec: &ContainerCodec,
    naming: &OutputConfig,
    input: &Path,
    password: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let container = load_image(input)?;
    let image = codec.decode(&container, password)?;

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        decrypted_output_path(input, &naming.encrypted_suffix, &naming.decrypted_suffix)
    });
    save_png(&image, &output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_case_insensitive() {
        assert!(is_supported(Path::new("a/photo.JPG")));
        assert!(is_supported(Path::new("photo.tiff")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("no_extension")));
    }

    #[test]
    fn encrypted_name() {
        assert_eq!(
            encrypted_output_path(Path::new("pics/cat.jpg"), "_encrypted"),
            PathBuf::from("pics/cat_encrypted.png")
        );
    }

    #[test]
    fn decrypted_name_replaces_suffix() {
        assert_eq!(
            decrypted_output_path(Path::new("pics/cat_encrypted.png"), "_encrypted", "_decrypted"),
            PathBuf::from("pics/cat_decrypted.png")
        );
        assert_eq!(
            decrypted_output_path(Path::new("shared.png"), "_encrypted", "_decrypted"),
            PathBuf::from("shared_decrypted.png")
        );
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_image("/no/such/picture.png"),
            Err(VaultError::InputNotFound(_))
        ));
    }
}
