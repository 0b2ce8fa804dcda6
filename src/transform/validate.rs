//! Request validation ahead of any pixel work.
//!
//! # Responsibilities
//! - Reject oversized payloads from the declared length, before buffering
//! - Reject absent bodies
//! - Decode the body and reject undecodable data
//! - Enforce the decoded dimension cap
//! - Enforce the 8-bit RGBA pixel format gate
//!
//! # Design Decisions
//! - Rules run in a fixed order; the first failure wins
//! - Every rejection maps to HTTP 400 with no body
//! - The declared-length check bounds memory use before the body is read

use super::raster::Raster;
use super::TransformError;
use crate::config::LimitsConfig;
use crate::routing::path::CropRect;

/// Why a request was rejected before the pipeline ran.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Declared content length exceeds the payload cap.
    #[error("declared content length {declared} exceeds the {max} byte limit")]
    PayloadTooLarge { declared: u64, max: u64 },

    /// The request carried no body.
    #[error("request body is absent")]
    MissingBody,

    /// The body could not be decoded as an image.
    #[error("undecodable image payload: {0}")]
    Undecodable(String),

    /// The decoded image is wider or taller than the dimension cap.
    #[error("decoded image {width}x{height} exceeds the {max} pixel limit")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },

    /// The decoded pixel format is not 8-bit RGBA.
    #[error("unsupported pixel format, expected 8-bit RGBA")]
    UnsupportedPixelFormat,

    /// The crop output area exceeds the pixel budget.
    #[error("crop output {w}x{h} exceeds the {max_pixels} pixel budget")]
    CropTooLarge { w: i32, h: i32, max_pixels: u64 },
}

/// Bound the crop output area: the canvas is allocated at the
/// requested extents, so an unbounded rectangle would let one request
/// exhaust memory. The budget sits well above the decoded-dimension
/// cap, so crops that pad a legal image stay valid. Non-positive
/// extents pass through; the intersection test turns them into 204.
pub fn check_crop_extents(rect: CropRect, limits: &LimitsConfig) -> Result<(), Rejection> {
    if rect.w <= 0 || rect.h <= 0 {
        return Ok(());
    }
    let area = i64::from(rect.w) * i64::from(rect.h);
    if area as u64 > limits.max_crop_pixels {
        return Err(Rejection::CropTooLarge {
            w: rect.w,
            h: rect.h,
            max_pixels: limits.max_crop_pixels,
        });
    }
    Ok(())
}

/// Check the declared content length against the payload cap, before
/// anything is buffered. A request without a declared length passes
/// here; the body read itself is capped separately.
pub fn check_declared_length(
    declared: Option<u64>,
    limits: &LimitsConfig,
) -> Result<(), Rejection> {
    match declared {
        Some(declared) if declared > limits.max_body_bytes => Err(Rejection::PayloadTooLarge {
            declared,
            max: limits.max_body_bytes,
        }),
        _ => Ok(()),
    }
}

/// Decode and validate a fully read body. On success the caller owns
/// the raster for the rest of the request.
pub fn validate_body(body: &[u8], limits: &LimitsConfig) -> Result<Raster, Rejection> {
    if body.is_empty() {
        return Err(Rejection::MissingBody);
    }

    let raster = Raster::decode(body).map_err(|e| match e {
        TransformError::Decode(msg) => Rejection::Undecodable(msg),
        other => Rejection::Undecodable(other.to_string()),
    })?;

    let (width, height) = (raster.width(), raster.height());
    if width > limits.max_dimension || height > limits.max_dimension {
        return Err(Rejection::DimensionsTooLarge {
            width,
            height,
            max: limits.max_dimension,
        });
    }

    if !raster.is_rgba8() {
        return Err(Rejection::UnsupportedPixelFormat);
    }

    Ok(raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn rgba_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn rgb_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([10, 20, 30]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn declared_length_boundary() {
        let limits = LimitsConfig::default();
        assert!(check_declared_length(None, &limits).is_ok());
        assert!(check_declared_length(Some(limits.max_body_bytes), &limits).is_ok());

        let over = check_declared_length(Some(limits.max_body_bytes + 1), &limits);
        assert!(matches!(over, Err(Rejection::PayloadTooLarge { .. })));
    }

    #[test]
    fn empty_body_is_missing() {
        let limits = LimitsConfig::default();
        assert_eq!(validate_body(&[], &limits).err(), Some(Rejection::MissingBody));
    }

    #[test]
    fn garbage_is_undecodable() {
        let limits = LimitsConfig::default();
        let result = validate_body(b"definitely not an image", &limits);
        assert!(matches!(result, Err(Rejection::Undecodable(_))));
    }

    #[test]
    fn dimension_boundary() {
        let limits = LimitsConfig {
            max_dimension: 64,
            ..LimitsConfig::default()
        };

        assert!(validate_body(&rgba_png(64, 64), &limits).is_ok());

        let wide = validate_body(&rgba_png(65, 1), &limits);
        assert!(matches!(wide, Err(Rejection::DimensionsTooLarge { .. })));

        let tall = validate_body(&rgba_png(1, 65), &limits);
        assert!(matches!(tall, Err(Rejection::DimensionsTooLarge { .. })));
    }

    #[test]
    fn crop_budget_boundary() {
        let limits = LimitsConfig {
            max_crop_pixels: 24,
            ..LimitsConfig::default()
        };

        let at_budget = CropRect { x: -5, y: -5, w: 4, h: 6 };
        assert!(check_crop_extents(at_budget, &limits).is_ok());

        let over = CropRect { x: 0, y: 0, w: 5, h: 5 };
        assert!(matches!(
            check_crop_extents(over, &limits),
            Err(Rejection::CropTooLarge { .. })
        ));

        // Non-positive extents are the 204 path, not a rejection.
        let negative = CropRect { x: 0, y: 0, w: -10, h: 10 };
        assert!(check_crop_extents(negative, &limits).is_ok());
    }

    #[test]
    fn padded_crop_extents_stay_within_default_budget() {
        let limits = LimitsConfig::default();

        // A crop padding a maximum-size image on every side must pass.
        let padded = CropRect { x: -5, y: -5, w: 1010, h: 1010 };
        assert!(check_crop_extents(padded, &limits).is_ok());

        let runaway = CropRect { x: 0, y: 0, w: 2_000_000_000, h: 2_000_000_000 };
        assert!(matches!(
            check_crop_extents(runaway, &limits),
            Err(Rejection::CropTooLarge { .. })
        ));
    }

    #[test]
    fn pixel_format_gate() {
        let limits = LimitsConfig::default();
        // Valid dimensions, wrong pixel format: still rejected.
        let result = validate_body(&rgb_png(10, 10), &limits);
        assert_eq!(result.err(), Some(Rejection::UnsupportedPixelFormat));
    }

    #[test]
    fn valid_image_passes_and_is_owned() {
        let limits = LimitsConfig::default();
        let raster = validate_body(&rgba_png(10, 10), &limits).unwrap();
        assert_eq!((raster.width(), raster.height()), (10, 10));
        assert!(raster.is_rgba8());
    }
}
