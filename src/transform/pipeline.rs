//! The per-request transform pipeline.
//!
//! # Data Flow
//! ```text
//! Validated raster + RouteMatch
//!     → Oriented (rotate/flip in place; rotations swap dimensions)
//!     → Cropped-or-Rejected (intersect rect with post-orientation bounds)
//!     → Encoded (PNG) or Empty (no intersection → HTTP 204)
//! ```
//!
//! # Design Decisions
//! - The intersection test runs against the *post-orientation* bounds
//! - A rectangle with a non-positive extent is empty and intersects
//!   nothing; the signed components parse, the crop simply never hits
//! - Empty is a defined outcome, not an error

use super::raster::Raster;
use super::TransformError;
use crate::routing::path::{CropRect, RouteMatch};

/// Terminal outcome of a pipeline run.
pub enum Outcome {
    /// Orientation and crop succeeded; PNG bytes for the 200 body.
    Png(Vec<u8>),
    /// The crop rectangle does not intersect the reoriented image
    /// bounds. Maps to HTTP 204.
    Empty,
}

/// Run the pipeline over an exclusively owned raster.
pub fn run(mut raster: Raster, route: RouteMatch) -> Result<Outcome, TransformError> {
    raster.orient(route.transform);

    if !intersects(route.rect, raster.width(), raster.height()) {
        return Ok(Outcome::Empty);
    }

    raster.crop_to(route.rect);
    Ok(Outcome::Png(raster.encode_png()?))
}

/// Rectangle intersection against the bounds `(0, 0, width, height)`.
///
/// Strict overlap in both axes; edge-touching rectangles do not
/// intersect. i64 arithmetic keeps `x + w` from wrapping for extreme
/// component values.
fn intersects(rect: CropRect, width: u32, height: u32) -> bool {
    if rect.w <= 0 || rect.h <= 0 {
        return false;
    }
    let (x, y) = (i64::from(rect.x), i64::from(rect.y));
    x < i64::from(width)
        && x + i64::from(rect.w) > 0
        && y < i64::from(height)
        && y + i64::from(rect.h) > 0
}
