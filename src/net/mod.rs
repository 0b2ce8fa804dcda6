//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! start(addr)
//!     → listener.rs (bind socket, spawn the single accept loop)
//!     → each accepted connection handed to http::dispatch
//!     → loop resumes accepting immediately
//!
//! stop() / dispose()
//!     → cooperative cancellation of the accept loop
//!     → join the loop task; socket released on task exit
//! ```
//!
//! # Design Decisions
//! - Exactly one accept loop per running server
//! - Lifecycle transitions gated by one mutex; no process-wide singleton
//! - One bad accept must not kill the server

pub mod listener;

pub use listener::{Server, ServerError};
