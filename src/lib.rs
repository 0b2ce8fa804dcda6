//! HTTP image transform server library.
//!
//! Accepts a raw image payload with the transform instruction encoded
//! in the URL path (`/process/<kind>/<x>,<y>,<w>,<h>`), applies an
//! orientation change and a conditional crop, and returns the result
//! as PNG.

pub mod config;
pub mod http;
pub mod net;
pub mod observability;
pub mod routing;
pub mod transform;

pub use config::ServerConfig;
pub use net::listener::{Server, ServerError};
