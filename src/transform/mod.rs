//! Transform subsystem.
//!
//! # Data Flow
//! ```text
//! Request body (raw image bytes)
//!     → validate.rs (size, decodability, dimensions, pixel format)
//!     → pipeline.rs (orient → crop-or-reject → encode)
//!     → PNG bytes or the empty-result outcome
//!
//! raster.rs wraps the `image` crate; nothing else touches pixel data.
//! ```
//!
//! # Design Decisions
//! - Strictly sequential stages, no backtracking
//! - A raster is exclusively owned by one request; never shared, never cached
//! - An out-of-bounds crop rectangle is a defined empty result, not an error

pub mod pipeline;
pub mod raster;
pub mod validate;

pub use pipeline::{run, Outcome};
pub use raster::Raster;
pub use validate::Rejection;

/// Failures inside the pipeline itself. Validation rejections are a
/// separate type ([`Rejection`]); these are the faults that remain once
/// a request has passed validation.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The body could not be decoded as an image.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// PNG serialization of the finished image failed.
    #[error("PNG encode failed: {0}")]
    Encode(String),
}
