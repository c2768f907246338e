//! Crop region geometry.
//!
//! The crop widget reports each region twice: as percentages of the source
//! dimensions and as source pixels. Both are kept, but only the pixel form
//! drives extraction.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner of the (orientation-corrected) source
//! - `x`/`y` may be negative or extend past the source; the part of the
//!   region outside the source produces transparent output pixels

use serde::{Deserialize, Serialize};

/// Crop rectangle in source pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The part of a [`PixelRect`] that overlaps the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedRegion {
    /// Left edge in source coordinates.
    pub src_x: u32,
    /// Top edge in source coordinates.
    pub src_y: u32,
    /// Left edge in output coordinates.
    pub dst_x: u32,
    /// Top edge in output coordinates.
    pub dst_y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width x height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Build a rectangle from the fractional values a JavaScript widget hands over.
    ///
    /// Values are rounded to the nearest pixel; negative or non-finite sizes
    /// collapse to zero.
    pub fn from_f64(x: f64, y: f64, width: f64, height: f64) -> Self {
        fn coord(v: f64) -> i32 {
            if v.is_finite() {
                v.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
            } else {
                0
            }
        }
        fn size(v: f64) -> u32 {
            if v.is_finite() {
                v.round().clamp(0.0, u32::MAX as f64) as u32
            } else {
                0
            }
        }
        Self::new(coord(x), coord(y), size(width), size(height))
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Intersect with a `width x height` image.
    ///
    /// Returns `None` when the rectangle does not touch the image at all.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<ClippedRegion> {
        let left = (self.x as i64).max(0);
        let top = (self.y as i64).max(0);
        let right = (self.x as i64 + self.width as i64).min(width as i64);
        let bottom = (self.y as i64 + self.height as i64).min(height as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some(ClippedRegion {
            src_x: left as u32,
            src_y: top as u32,
            dst_x: (left - self.x as i64) as u32,
            dst_y: (top - self.y as i64) as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Crop rectangle as percentages (0-100) of the source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PercentRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PercentRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert to pixel units for a `width x height` source.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let w = width as f64 / 100.0;
        let h = height as f64 / 100.0;
        PixelRect::from_f64(self.x * w, self.y * h, self.width * w, self.height * h)
    }
}

/// Pan offset of the crop widget. Stored and handed back, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropPosition {
    pub x: f64,
    pub y: f64,
}

impl CropPosition {
    pub const ORIGIN: CropPosition = CropPosition { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside() {
        let rect = PixelRect::new(100, 50, 200, 200);
        let clip = rect.clip_to(800, 600).unwrap();
        assert_eq!(
            clip,
            ClippedRegion {
                src_x: 100,
                src_y: 50,
                dst_x: 0,
                dst_y: 0,
                width: 200,
                height: 200,
            }
        );
    }

    #[test]
    fn test_clip_negative_origin() {
        let rect = PixelRect::new(-10, -5, 30, 30);
        let clip = rect.clip_to(100, 100).unwrap();
        assert_eq!((clip.src_x, clip.src_y), (0, 0));
        assert_eq!((clip.dst_x, clip.dst_y), (10, 5));
        assert_eq!((clip.width, clip.height), (20, 25));
    }

    #[test]
    fn test_clip_past_right_edge() {
        let rect = PixelRect::new(90, 0, 20, 10);
        let clip = rect.clip_to(100, 100).unwrap();
        assert_eq!(clip.width, 10);
        assert_eq!(clip.height, 10);
    }

    #[test]
    fn test_clip_disjoint() {
        assert!(PixelRect::new(200, 200, 10, 10).clip_to(100, 100).is_none());
        assert!(PixelRect::new(-20, 0, 20, 10).clip_to(100, 100).is_none());
        assert!(PixelRect::new(0, 0, 0, 10).clip_to(100, 100).is_none());
    }

    #[test]
    fn test_from_f64_rounds_and_saturates() {
        assert_eq!(
            PixelRect::from_f64(10.4, 9.6, 99.5, -3.0),
            PixelRect::new(10, 10, 100, 0)
        );
        assert_eq!(
            PixelRect::from_f64(f64::NAN, 1.0, f64::INFINITY, 2.0),
            PixelRect::new(0, 1, 0, 2)
        );
    }

    #[test]
    fn test_percent_to_pixels() {
        let pct = PercentRect::new(12.5, 25.0, 50.0, 50.0);
        assert_eq!(pct.to_pixels(800, 600), PixelRect::new(100, 150, 400, 300));
    }

    #[test]
    fn test_square_detection() {
        assert!(PixelRect::new(0, 0, 5, 5).is_square());
        assert!(!PixelRect::new(0, 0, 5, 6).is_square());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the clipped region always lies inside both the image and the output.
        #[test]
        fn prop_clip_stays_in_bounds(
            (img_w, img_h) in (1u32..=200, 1u32..=200),
            (x, y) in (-300i32..=300, -300i32..=300),
            (w, h) in (0u32..=300, 0u32..=300),
        ) {
            let rect = PixelRect::new(x, y, w, h);
            if let Some(clip) = rect.clip_to(img_w, img_h) {
                prop_assert!(clip.width >= 1 && clip.height >= 1);
                prop_assert!(clip.src_x + clip.width <= img_w);
                prop_assert!(clip.src_y + clip.height <= img_h);
                prop_assert!(clip.dst_x + clip.width <= w);
                prop_assert!(clip.dst_y + clip.height <= h);
            }
        }

        /// Property: a rectangle inside the image is returned unchanged.
        #[test]
        fn prop_clip_identity_inside(
            (img_w, img_h) in (10u32..=200, 10u32..=200),
            (fx, fy) in (0.0f64..0.5, 0.0f64..0.5),
        ) {
            let x = (img_w as f64 * fx) as u32;
            let y = (img_h as f64 * fy) as u32;
            let rect = PixelRect::new(x as i32, y as i32, img_w - x, img_h - y);
            let clip = rect.clip_to(img_w, img_h).unwrap();
            prop_assert_eq!((clip.src_x, clip.src_y), (x, y));
            prop_assert_eq!((clip.dst_x, clip.dst_y), (0, 0));
            prop_assert_eq!((clip.width, clip.height), (rect.width, rect.height));
        }
    }
}
