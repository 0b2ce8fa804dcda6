//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted TCP connection
//!     → dispatch.rs (one task per connection, hyper HTTP/1 exchange)
//!     → routing layer (path grammar → RouteMatch)
//!     → transform layer (validate → orient → crop → encode)
//!     → response.rs (200 PNG / 204 empty / 400 empty)
//!     → Connection closed
//! ```

pub mod dispatch;
pub mod response;
