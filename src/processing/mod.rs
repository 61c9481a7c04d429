//! # Image Processing and Steganography
//!
//! The container pipeline, leaves first:
//!
//! - [`raw_image`]: the RGB pixel model and its PNG interchange encoding
//! - [`decoy`]: random filler pixels
//! - [`packer`]: payload <-> pixel layout and canvas growth
//! - [`container`]: the encode/decode codec
//! - [`detector`]: heuristic "is this a container" check
//! - [`worker`]: async wrappers over the blocking codec
//! - [`sample`]: demo picture generator

pub mod container;
pub mod decoy;
pub mod detector;
pub mod packer;
pub mod raw_image;
pub mod sample;
pub mod worker;

// Re-export main types for convenience
pub use container::{ContainerCodec, EncodedContainer};
pub use decoy::DecoyGenerator;
pub use detector::{inspect, looks_like_container, DetectionReport};
pub use packer::PixelPacker;
pub use raw_image::RawImage;
