//! # Container Detection
//!
//! A cheap content-based guess at whether an image is a vault container. It only
//! looks at the two header pixels, so an ordinary photo can pass by accident when
//! its first six channel bytes happen to spell a plausible length. Use the verdict
//! for routing and warnings; only a successful decode proves anything.
//!
//! For uniformly random header bytes the false-positive rate is bounded by
//! `min(MAX_PLAUSIBLE_LEN, 3 * (pixels - 2)) / 2^32`, i.e. below 2.5% for any
//! image and far below that for small ones.

use serde::Serialize;

use crate::crypto::kdf::SALT_LEN;
use crate::processing::packer::{read_length_header, required_pixels};
use crate::processing::raw_image::RawImage;

/// Smallest payload a real container can carry (the salt alone).
pub const MIN_PLAUSIBLE_LEN: u64 = SALT_LEN as u64;

/// Largest payload length the detector will believe.
pub const MAX_PLAUSIBLE_LEN: u64 = 100 * 1024 * 1024;

/// What the detector saw in an image header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionReport {
    pub width: u32,
    pub height: u32,
    /// Length read from the header, if the image has one.
    pub declared_len: Option<u32>,
    pub required_pixels: Option<u64>,
    pub available_pixels: u64,
    pub looks_like_container: bool,
}

/// Full header analysis.
pub fn inspect(image: &RawImage) -> DetectionReport {
    let available_pixels = image.pixel_count();
    let declared_len = read_length_header(image);
    let required = declared_len.map(|len| required_pixels(len as u64));

    let looks_like_container = declared_len
        .map(|len| plausible(len as u64, available_pixels))
        .unwrap_or(false);

    DetectionReport {
        width: image.width(),
        height: image.height(),
        declared_len,
        required_pixels: required,
        available_pixels,
        looks_like_container,
    }
}

fn plausible(len: u64, available_pixels: u64) -> bool {
    (MIN_PLAUSIBLE_LEN..=MAX_PLAUSIBLE_LEN).contains(&len)
        && required_pixels(len) <= available_pixels
}

/// Heuristic container check. See the module docs for its limits.
pub fn looks_like_container(image: &RawImage) -> bool {
    inspect(image).looks_like_container
}
