//! Source image decoding for Cropkit.
//!
//! This module turns the bytes of a user-selected file into a [`SourceImage`]:
//! - Content-sniffed decoding of every browser-common raster format
//! - EXIF orientation correction, so pixel coordinates match what the page shows
//! - Size limiting before any decode work is done
//!
//! # Examples
//!
//! ```ignore
//! use cropkit_core::decode::decode_image;
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod reader;
mod types;

pub use reader::{decode_image, decode_image_with_limit};
pub use types::{DecodeError, Orientation, SourceImage};
