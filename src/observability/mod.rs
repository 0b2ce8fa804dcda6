//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! accept loop / dispatch produce:
//!     → metrics.rs (counters, histograms)
//!     → tracing events (structured fields, request IDs)
//!
//! Consumers:
//!     → Metrics endpoint (Prometheus scrape)
//!     → Log aggregation (stdout)
//! ```
//!
//! # Design Decisions
//! - Faults the accept loop swallows for availability are still
//!   counted here; discard the failure, not the signal
//! - Metric updates are cheap (atomic increments)

pub mod metrics;
