//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router::dispatch produces:
//!     → logging.rs (subscriber setup for structured events)
//!     → metrics.rs (dispatch counters and latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → any `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing a subscriber or recorder is the host's call
//! - Request ID is attached to every dispatch span
//! - Metrics are cheap no-ops when no recorder is installed

pub mod logging;
pub mod metrics;

pub use logging::LogFormat;
