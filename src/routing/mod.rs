//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → path.rs (match against the fixed transform grammar)
//!     → Return: RouteMatch (kind + rectangle) or NoMatch
//! ```
//!
//! # Design Decisions
//! - One fixed grammar, anchored at both ends; no route table
//! - No regex in the hot path (prefix/split parsing only)
//! - Deterministic: same path always produces the same result
//! - Explicit NoMatch rather than a partial match

pub mod path;

pub use path::{match_path, CropRect, RouteMatch, Transform};
