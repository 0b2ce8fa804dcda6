//! Image capability adapter over the `image` crate.
//!
//! # Responsibilities
//! - Decode raw bytes into an owned raster
//! - Report width, height, pixel format
//! - Apply in-place orientation changes
//! - Blit the crop overlap into a fresh transparent buffer
//! - Encode the result as PNG
//!
//! # Design Decisions
//! - This is the only module that touches `image` types directly
//! - Crop replaces the raster wholesale; orientation mutates in place

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};

use super::TransformError;
use crate::routing::path::{CropRect, Transform};

/// Decoded image, exclusively owned by one request for its entire
/// lifetime.
pub struct Raster {
    image: DynamicImage,
}

impl Raster {
    /// Decode raw bytes into a raster. The format is sniffed from the
    /// data itself.
    pub fn decode(data: &[u8]) -> Result<Self, TransformError> {
        let image =
            image::load_from_memory(data).map_err(|e| TransformError::Decode(e.to_string()))?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// True when the decoded pixel format is 8-bit RGBA, the only
    /// format the pipeline accepts.
    pub fn is_rgba8(&self) -> bool {
        matches!(self.image, DynamicImage::ImageRgba8(_))
    }

    /// Apply an orientation change. Rotations swap width and height;
    /// flips do not.
    pub fn orient(&mut self, transform: Transform) {
        self.image = match transform {
            Transform::RotateCw => self.image.rotate90(),
            Transform::RotateCcw => self.image.rotate270(),
            Transform::FlipV => self.image.flipv(),
            Transform::FlipH => self.image.fliph(),
        };
    }

    /// Replace the raster with the requested rectangle, sampling the
    /// overlap with the current bounds. Pixels of the rectangle that
    /// fall outside the current bounds come out transparent.
    ///
    /// Callers must have established that the rectangle intersects the
    /// bounds; extents are positive here.
    pub fn crop_to(&mut self, rect: CropRect) {
        let mut out = RgbaImage::new(rect.w as u32, rect.h as u32);

        // i64 arithmetic: x + w can exceed i32 for corner-case rects.
        let (x, y) = (i64::from(rect.x), i64::from(rect.y));
        let sx0 = x.max(0);
        let sy0 = y.max(0);
        let sx1 = (x + i64::from(rect.w)).min(i64::from(self.image.width()));
        let sy1 = (y + i64::from(rect.h)).min(i64::from(self.image.height()));

        if sx0 < sx1 && sy0 < sy1 {
            let overlap = self
                .image
                .crop_imm(sx0 as u32, sy0 as u32, (sx1 - sx0) as u32, (sy1 - sy0) as u32)
                .into_rgba8();
            image::imageops::replace(&mut out, &overlap, sx0 - x, sy0 - y);
        }

        self.image = DynamicImage::ImageRgba8(out);
    }

    /// Serialize to a PNG byte stream.
    pub fn encode_png(&self) -> Result<Vec<u8>, TransformError> {
        let mut buf = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| TransformError::Encode(e.to_string()))?;
        Ok(buf)
    }

    #[cfg(test)]
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        use image::GenericImageView;
        self.image.get_pixel(x, y).0
    }

    #[cfg(test)]
    pub(crate) fn from_rgba8(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
        }
    }
}
