//! # Pixel Packing
//!
//! Lays a length-prefixed byte blob out as RGB pixels and reads it back.
//!
//! ## Layout
//!
//! ```text
//! pixel[0..1]              length header: u32 big-endian in bytes 0..3, bytes 4..5 zero
//! pixel[2 .. 2+ceil(L/3)]  payload, 3 bytes per pixel, final pixel zero-padded
//! pixel[.. W*H]            decoy noise
//! ```
//!
//! The header is authoritative on extraction: padding bytes and noise are never
//! returned, whatever the canvas size.
//!
//! ## Canvas growth
//! When the requested canvas cannot hold the payload it is enlarged to the smallest
//! size that fits, keeping the requested aspect ratio. A zero-sized request grows as
//! a square.

use log::debug;

use crate::error::{Result, VaultError};
use crate::processing::decoy::DecoyGenerator;
use crate::processing::raw_image::{RawImage, CHANNELS};

/// Pixels reserved for the length header.
pub const HEADER_PIXELS: u64 = 2;

/// Header bytes (two pixels worth).
const HEADER_BYTES: usize = HEADER_PIXELS as usize * CHANNELS;

/// Pixels needed to carry a payload of `payload_len` bytes, header included.
pub fn required_pixels(payload_len: u64) -> u64 {
    HEADER_PIXELS + payload_len.div_ceil(CHANNELS as u64)
}

/// Read the declared payload length from the first two pixels.
///
/// Returns `None` for images with fewer than two pixels.
pub fn read_length_header(image: &RawImage) -> Option<u32> {
    let bytes = image.as_bytes();
    if bytes.len() < HEADER_BYTES {
        return None;
    }
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Smallest canvas at least `min_width x min_height` in shape that holds `required` pixels.
///
/// Both sides are scaled by the same factor; each scaled side is tried rounded down
/// and up, with the other side sized to fit, and the smallest area wins. Never
/// shrinks a requested dimension. With a zero dimension the canvas grows as a square.
pub fn grow_canvas(min_width: u32, min_height: u32, required: u64) -> (u64, u64) {
    let (w, h) = (min_width as u64, min_height as u64);
    if w * h >= required {
        return (w, h);
    }

    if w == 0 || h == 0 {
        let side = ceil_sqrt(required);
        return (side, required.div_ceil(side));
    }

    let scale = (required as f64 / (w * h) as f64).sqrt();
    let (scaled_w, scaled_h) = (w as f64 * scale, h as f64 * scale);

    let fit_width = |width: u64| (width, required.div_ceil(width).max(h));
    let fit_height = |height: u64| (required.div_ceil(height).max(w), height);

    let candidates = [
        fit_width((scaled_w.floor() as u64).max(w)),
        fit_width((scaled_w.ceil() as u64).max(w)),
        fit_height((scaled_h.floor() as u64).max(h)),
        fit_height((scaled_h.ceil() as u64).max(h)),
    ];
    candidates
        .into_iter()
        .min_by_key(|&(cw, ch)| cw.saturating_mul(ch))
        .unwrap_or_else(|| fit_width(w))
}

fn ceil_sqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as u64;
    // f64 rounding can land one off either way for large n.
    while root * root > n {
        root -= 1;
    }
    while root * root < n {
        root += 1;
    }
    root
}

/// Serializes payloads into carrier pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PixelPacker {
    max_canvas_pixels: Option<u64>,
}

impl PixelPacker {
    /// Packer with unbounded canvas growth.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap canvas growth; packing beyond the cap fails with [`VaultError::CapacityOverflow`].
    pub fn with_max_canvas_pixels(max_canvas_pixels: Option<u64>) -> Self {
        Self { max_canvas_pixels }
    }

    pub fn max_canvas_pixels(&self) -> Option<u64> {
        self.max_canvas_pixels
    }

    /// Lay `payload` out on a canvas of at least `min_width x min_height`, filling
    /// unused pixels from `decoy`.
    ///
    /// # Errors
    /// [`VaultError::CapacityOverflow`] when the payload length does not fit the
    /// 32-bit header, when the canvas would exceed the configured cap, or when a
    /// grown dimension does not fit in `u32`.
    pub fn pack(
        &self,
        payload: &[u8],
        min_width: u32,
        min_height: u32,
        decoy: &mut DecoyGenerator,
    ) -> Result<RawImage> {
        let length = u32::try_from(payload.len()).map_err(|_| VaultError::CapacityOverflow {
            required: required_pixels(payload.len() as u64),
            limit: required_pixels(u32::MAX as u64),
        })?;

        let required = required_pixels(payload.len() as u64);
        let (width, height) = grow_canvas(min_width, min_height, required);
        let total = width * height;

        if let Some(limit) = self.max_canvas_pixels {
            if total > limit {
                return Err(VaultError::CapacityOverflow {
                    required: total,
                    limit,
                });
            }
        }
        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(VaultError::CapacityOverflow {
                    required: total,
                    limit: u32::MAX as u64,
                })
            }
        };

        if (width, height) != (min_width, min_height) {
            debug!(
                "Canvas grown from {}x{} to {}x{} for {} payload bytes",
                min_width,
                min_height,
                width,
                height,
                payload.len()
            );
        }

        let mut data = vec![0u8; total as usize * CHANNELS];
        data[..4].copy_from_slice(&length.to_be_bytes());
        data[HEADER_BYTES..HEADER_BYTES + payload.len()].copy_from_slice(payload);

        // Everything past the (zero-padded) payload pixels is decoy noise.
        let noise_start = required as usize * CHANNELS;
        decoy.fill(&mut data[noise_start..]);

        RawImage::new(width, height, data)
    }

    /// Extract the payload from a container.
    ///
    /// # Errors
    /// [`VaultError::MalformedContainer`] if the image is too small for a header or
    /// the header declares more data than the image can hold.
    pub fn unpack(&self, image: &RawImage) -> Result<Vec<u8>> {
        let available = image.pixel_count();
        let Some(declared) = read_length_header(image) else {
            return Err(VaultError::MalformedContainer {
                declared: 0,
                required_pixels: HEADER_PIXELS,
                available_pixels: available,
            });
        };

        let required = required_pixels(declared as u64);
        if required > available {
            return Err(VaultError::MalformedContainer {
                declared: declared as u64,
                required_pixels: required,
                available_pixels: available,
            });
        }

        let start = HEADER_BYTES;
        let end = start + declared as usize;
        Ok(image.as_bytes()[start..end].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(payload: &[u8], w: u32, h: u32) -> RawImage {
        PixelPacker::new()
            .pack(payload, w, h, &mut DecoyGenerator::new())
            .unwrap()
    }

    #[test]
    fn seventeen_byte_payload_layout() {
        let payload: Vec<u8> = (1..=17).collect();
        assert_eq!(required_pixels(17), 8);

        let img = pack(&payload, 4, 2);
        assert_eq!((img.width(), img.height()), (4, 2));
        assert_eq!(read_length_header(&img), Some(17));

        let bytes = img.as_bytes();
        assert_eq!(&bytes[..6], &[0, 0, 0, 17, 0, 0]);
        assert_eq!(&bytes[6..23], payload.as_slice());
        // Final data pixel carries 2 bytes of payload + 1 byte of padding.
        assert_eq!(bytes[23], 0);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn seventeen_bytes_fit_a_single_row() {
        let img = pack(&[0xAB; 17], 8, 1);
        assert_eq!(img.pixel_count(), 8);
        assert_eq!(PixelPacker::new().unpack(&img).unwrap(), vec![0xAB; 17]);
    }

    #[test]
    fn roundtrip_each_remainder() {
        for len in [16usize, 17, 18, 19, 20, 21] {
            let payload: Vec<u8> = (0..len).map(|i| (i * 31 + 7) as u8).collect();
            let img = pack(&payload, 5, 5);
            assert_eq!(PixelPacker::new().unpack(&img).unwrap(), payload, "len {}", len);
        }
    }

    #[test]
    fn padding_is_zero_and_excluded() {
        let img = pack(&[0xFF; 16], 10, 10);
        // 16 bytes -> 6 pixels (18 bytes), 2 padding bytes.
        assert_eq!(&img.as_bytes()[22..24], &[0, 0]);
        assert_eq!(PixelPacker::new().unpack(&img).unwrap().len(), 16);
    }

    #[test]
    fn requested_canvas_kept_when_large_enough() {
        let img = pack(&[1; 30], 10, 10);
        assert_eq!((img.width(), img.height()), (10, 10));
    }

    #[test]
    fn canvas_grows_keeping_aspect() {
        // 2 + 400 = 402 pixels needed, 4:1 canvas requested.
        let (w, h) = grow_canvas(8, 2, 402);
        assert!(w * h >= 402);
        assert!(w >= 8 && h >= 2);
        let ratio = w as f64 / h as f64;
        assert!((3.0..=5.0).contains(&ratio), "ratio {} drifted", ratio);
    }

    #[test]
    fn canvas_growth_is_tight() {
        for required in [3u64, 8, 50, 101, 9999, 123_457] {
            for (w, h) in [(1u32, 1u32), (3, 1), (1, 7), (4, 3), (16, 9)] {
                let (gw, gh) = grow_canvas(w, h, required);
                assert!(gw * gh >= required);
                // Less than one row or column of slack.
                assert!(gw * gh - required < gw.max(gh), "{}x{} for {}", gw, gh, required);
            }
        }
    }

    #[test]
    fn narrow_canvas_grows_along_its_long_side() {
        assert_eq!(grow_canvas(1, 1000, 1001), (1, 1001));
        assert_eq!(grow_canvas(1000, 1, 1001), (1001, 1));
        let (w, h) = grow_canvas(3, 4000, 12010);
        assert_eq!(w, 3);
        assert_eq!(w * h, 12012);
    }

    #[test]
    fn degenerate_request_grows_square() {
        assert_eq!(grow_canvas(0, 0, 8), (3, 3));
        assert_eq!(grow_canvas(0, 5, 16), (4, 4));
        let (w, h) = grow_canvas(7, 0, 10);
        assert_eq!(w, 4);
        assert!(w * h >= 10);
    }

    #[test]
    fn ceil_sqrt_exact() {
        assert_eq!(ceil_sqrt(1), 1);
        assert_eq!(ceil_sqrt(8), 3);
        assert_eq!(ceil_sqrt(9), 3);
        assert_eq!(ceil_sqrt(10), 4);
        assert_eq!(ceil_sqrt(u32::MAX as u64 * 3), 113_512);
    }

    #[test]
    fn canvas_cap_enforced() {
        let packer = PixelPacker::with_max_canvas_pixels(Some(10));
        let result = packer.pack(&[0; 100], 1, 1, &mut DecoyGenerator::new());
        assert!(matches!(result, Err(VaultError::CapacityOverflow { limit: 10, .. })));
    }

    #[test]
    fn header_larger_than_image_is_malformed() {
        let mut img = RawImage::filled(3, 3, [0, 0, 0]);
        img.as_bytes_mut()[..4].copy_from_slice(&100u32.to_be_bytes());
        assert!(matches!(
            PixelPacker::new().unpack(&img),
            Err(VaultError::MalformedContainer { declared: 100, .. })
        ));
    }

    #[test]
    fn header_exactly_filling_image_is_accepted() {
        let mut img = RawImage::filled(3, 3, [5, 5, 5]);
        // 9 pixels: 2 header + 7 data = 21 bytes.
        img.as_bytes_mut()[..6].copy_from_slice(&[0, 0, 0, 21, 0, 0]);
        assert_eq!(PixelPacker::new().unpack(&img).unwrap(), vec![5; 21]);
    }

    #[test]
    fn tiny_image_is_malformed() {
        let img = RawImage::filled(1, 1, [0, 0, 0]);
        assert!(read_length_header(&img).is_none());
        assert!(matches!(
            PixelPacker::new().unpack(&img),
            Err(VaultError::MalformedContainer { .. })
        ));
    }
}
