//! # Raw Pixel Model
//!
//! [`RawImage`] is the only pixel representation the core understands: 8-bit RGB,
//! row-major, no alpha. Everything else (RGBA, palettes, grayscale, 16-bit) is
//! normalized to this model by [`RawImage::from_dynamic`] before it reaches the
//! codec.
//!
//! This module also owns the interchange encoding used to turn a secret image into
//! bytes for encryption. PNG is used because it is lossless: decode must hand back
//! exactly the pixels that went in. PNG cannot describe a zero-area image, so those
//! are written as an 8-byte `[width u32 BE][height u32 BE]` record instead; no PNG
//! stream is that short, so the two never collide.

use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

use crate::error::{Result, VaultError};

/// Channels per pixel.
pub const CHANNELS: usize = 3;

/// Length of the dimension record that stands in for a zero-area image.
const EMPTY_RECORD_LEN: usize = 8;

/// An 8-bit RGB image held entirely in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for RawImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RawImage {
    /// Wrap a pixel buffer, checking it matches the dimensions.
    ///
    /// # Errors
    /// [`VaultError::InvalidImage`] if `data.len() != width * height * 3`.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as u64 * height as u64 * CHANNELS as u64;
        if data.len() as u64 != expected {
            return Err(VaultError::InvalidImage(format!(
                "{}x{} needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A canvas filled with one color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Normalize any decoded image to 8-bit RGB.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let rgb = image.into_rgb8();
        let (width, height) = rgb.dimensions();
        Self {
            width,
            height,
            data: rgb.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Channel bytes, row-major RGB.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// RGB triple at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Overwrite the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Convert into the `image` crate's buffer type.
    pub fn to_rgb_image(&self) -> Result<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            VaultError::InvalidImage(format!(
                "buffer does not fit {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Serialize to PNG bytes.
    ///
    /// # Errors
    /// [`VaultError::Encode`] if the encoder rejects the image (e.g. zero dimensions).
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let buffer = self.to_rgb_image()?;
        let mut output_bytes = Vec::new();
        buffer
            .write_to(&mut Cursor::new(&mut output_bytes), ImageFormat::Png)
            .map_err(VaultError::Encode)?;
        Ok(output_bytes)
    }

    /// Serialize for encryption: PNG, or the dimension record for a zero-area image.
    pub fn to_interchange_bytes(&self) -> Result<Vec<u8>> {
        if self.pixel_count() > 0 {
            return self.to_png_bytes();
        }
        let mut record = Vec::with_capacity(EMPTY_RECORD_LEN);
        record.extend_from_slice(&self.width.to_be_bytes());
        record.extend_from_slice(&self.height.to_be_bytes());
        Ok(record)
    }

    /// Inverse of [`to_interchange_bytes`](Self::to_interchange_bytes).
    ///
    /// A dimension record is only honoured when it describes a zero-area image;
    /// anything else is handed to the PNG decoder (which rejects it).
    pub fn from_interchange_bytes(bytes: &[u8]) -> image::ImageResult<Self> {
        if bytes.len() == EMPTY_RECORD_LEN {
            let width = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            let height = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
            if width == 0 || height == 0 {
                return Ok(Self {
                    width,
                    height,
                    data: Vec::new(),
                });
            }
        }
        Self::from_png_bytes(bytes)
    }

    /// Decode PNG bytes produced by [`to_png_bytes`](Self::to_png_bytes).
    ///
    /// Returns the raw `image` error so callers can decide how to classify it.
    pub fn from_png_bytes(bytes: &[u8]) -> image::ImageResult<Self> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
        Ok(Self::from_dynamic(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn new_checks_buffer_length() {
        assert!(RawImage::new(2, 2, vec![0; 12]).is_ok());
        assert!(matches!(
            RawImage::new(2, 2, vec![0; 11]),
            Err(VaultError::InvalidImage(_))
        ));
    }

    #[test]
    fn pixel_access() {
        let mut img = RawImage::filled(3, 2, [1, 2, 3]);
        img.set_pixel(2, 1, [9, 8, 7]);
        assert_eq!(img.pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(img.pixel(2, 1), Some([9, 8, 7]));
        assert_eq!(img.pixel(3, 0), None);
        assert_eq!(&img.as_bytes()[15..18], &[9, 8, 7]);
    }

    #[test]
    fn png_roundtrip_is_exact() {
        let mut img = RawImage::filled(7, 5, [10, 20, 30]);
        img.set_pixel(3, 3, [255, 0, 128]);

        let png = img.to_png_bytes().unwrap();
        let back = RawImage::from_png_bytes(&png).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn alpha_is_dropped_on_normalize() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([1, 2, 3, 0]));
        rgba.put_pixel(1, 0, Rgba([4, 5, 6, 255]));

        let img = RawImage::from_dynamic(DynamicImage::ImageRgba8(rgba));
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn zero_area_images_use_dimension_record() {
        for (w, h) in [(0, 0), (0, 5), (7, 0)] {
            let img = RawImage::new(w, h, Vec::new()).unwrap();
            let bytes = img.to_interchange_bytes().unwrap();
            assert_eq!(bytes.len(), EMPTY_RECORD_LEN);
            assert_eq!(RawImage::from_interchange_bytes(&bytes).unwrap(), img);
        }
    }

    #[test]
    fn dimension_record_for_nonempty_image_is_rejected() {
        let mut bytes = 3u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&4u32.to_be_bytes());
        assert!(RawImage::from_interchange_bytes(&bytes).is_err());
    }

    #[test]
    fn nonempty_images_still_use_png() {
        let img = RawImage::filled(2, 2, [4, 5, 6]);
        let bytes = img.to_interchange_bytes().unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        assert_eq!(RawImage::from_interchange_bytes(&bytes).unwrap(), img);
    }

    #[test]
    fn garbage_is_not_png() {
        assert!(RawImage::from_png_bytes(b"definitely not a png").is_err());
    }
}
