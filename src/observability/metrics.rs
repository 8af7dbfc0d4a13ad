//! Dispatch metrics.
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by method and outcome
//!   (`handled`, `unhandled`, `failed`)
//! - `router_dispatch_duration_seconds` (histogram): time spent in the chain
//!
//! Nothing is exported here. Without a recorder these calls do nothing.

use std::time::Instant;

use crate::routing::Outcome;

pub const DISPATCH_TOTAL: &str = "router_dispatch_total";
pub const DISPATCH_DURATION: &str = "router_dispatch_duration_seconds";

/// Record a dispatch that completed without error.
pub fn record_dispatch(method: &str, outcome: Outcome, started: Instant) {
    let label = match outcome {
        Outcome::Handled(_) => "handled",
        Outcome::Unhandled => "unhandled",
    };

    ::metrics::counter!(DISPATCH_TOTAL, "method" => method.to_string(), "outcome" => label).increment(1);
    ::metrics::histogram!(DISPATCH_DURATION, "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}

/// Record a dispatch stopped by a middleware error.
pub fn record_failure(method: &str, status: u16, started: Instant) {
    ::metrics::counter!(
        DISPATCH_TOTAL,
        "method" => method.to_string(),
        "outcome" => "failed",
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!(DISPATCH_DURATION, "method" => method.to_string())
        .record(started.elapsed().as_secs_f64());
}
