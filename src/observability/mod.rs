//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / config / server
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (dispatch counters via the metrics facade)
//!
//! Consumers:
//!     → stdout (plain or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing subscribers and exporters
//!   is left to the binary
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
