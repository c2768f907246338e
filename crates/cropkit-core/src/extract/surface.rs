//! In-memory RGBA drawing surface.
//!
//! A surface starts fully transparent and supports the three operations the
//! extractor needs: copying a region of a source image, drawing another
//! surface through a circular clip, and encoding.

use super::CircleClip;
use crate::decode::SourceImage;
use crate::encode::{self, EncodeError, EncodedImage, OutputFormat};
use crate::geometry::PixelRect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DrawingSurface {
    /// Allocate a transparent `width x height` surface.
    ///
    /// Callers bound the size first; see [`super::MAX_OUTPUT_PIXELS`].
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y), or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Copy `region` of `source` onto this surface with its top-left at (0, 0).
    ///
    /// No scaling: one source pixel lands on one surface pixel. Whatever part
    /// of `region` falls outside the source, or outside this surface, is left
    /// untouched.
    pub fn draw_region(&mut self, source: &SourceImage, region: PixelRect) {
        let region = PixelRect {
            width: region.width.min(self.width),
            height: region.height.min(self.height),
            ..region
        };
        let Some(clip) = region.clip_to(source.width, source.height) else {
            log::debug!("crop region {:?} does not overlap the source", region);
            return;
        };

        let row_bytes = clip.width as usize * 4;
        for row in 0..clip.height {
            let src_start =
                ((clip.src_y + row) as usize * source.width as usize + clip.src_x as usize) * 4;
            let dst_start = self.offset(clip.dst_x, clip.dst_y + row);
            self.pixels[dst_start..dst_start + row_bytes]
                .copy_from_slice(&source.pixels[src_start..src_start + row_bytes]);
        }
    }

    /// Draw `other` (same size, placed at the origin) through a circular clip.
    ///
    /// Alpha is scaled by the clip coverage; colour channels are copied as-is
    /// wherever any coverage remains.
    pub fn draw_clipped(&mut self, other: &DrawingSurface, clip: &CircleClip) {
        let width = self.width.min(other.width);
        let height = self.height.min(other.height);

        for y in 0..height {
            for x in 0..width {
                let coverage = clip.coverage(x, y);
                if coverage <= 0.0 {
                    continue;
                }
                let src = other.offset(x, y);
                let dst = self.offset(x, y);
                let alpha = (other.pixels[src + 3] as f32 * coverage).round() as u8;
                if alpha == 0 {
                    continue;
                }
                self.pixels[dst..dst + 3].copy_from_slice(&other.pixels[src..src + 3]);
                self.pixels[dst + 3] = alpha;
            }
        }
    }

    /// Encode the surface contents.
    ///
    /// `quality` only applies to JPEG.
    pub fn encode(&self, format: OutputFormat, quality: u8) -> Result<EncodedImage, EncodeError> {
        let bytes = match format {
            OutputFormat::Jpeg => {
                encode::encode_jpeg_rgba(&self.pixels, self.width, self.height, quality)?
            }
            OutputFormat::Png => encode::encode_png(&self.pixels, self.width, self.height)?,
        };
        Ok(EncodedImage {
            format,
            width: self.width,
            height: self.height,
            bytes,
        })
    }
}
