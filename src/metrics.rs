//! Metric helpers for `lineframe`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking records decoded and published.
pub const RECORDS_DECODED: &str = "lineframe_records_decoded_total";
/// Name of the counter tracking records the payload decoder rejected.
pub const DECODE_FAILURES: &str = "lineframe_decode_failures_total";
/// Name of the counter tracking events dropped by a closed channel.
pub const EVENTS_DROPPED: &str = "lineframe_events_dropped_total";

/// Record a successfully decoded record.
pub fn inc_records() {
    #[cfg(feature = "metrics")]
    counter!(RECORDS_DECODED).increment(1);
}

/// Record a decode failure handled under the given policy.
pub fn inc_decode_failures(policy: crate::ErrorPolicy) {
    #[cfg(feature = "metrics")]
    counter!(DECODE_FAILURES, "policy" => policy.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = policy;
}

/// Record an event dropped because its channel had completed.
pub fn inc_dropped_events() {
    #[cfg(feature = "metrics")]
    counter!(EVENTS_DROPPED).increment(1);
}
