//! Metrics collection.
//!
//! # Metrics
//! - `router_resolutions_total` (counter): resolutions by match outcome
//! - `router_queue_not_found_total` (counter): failed queue expansions
//! - `router_reloads_total` (counter): routing table swaps
//!
//! # Design Decisions
//! - Emits through the `metrics` facade only; the embedding application
//!   decides whether and where a recorder exports

/// Record one resolution and whether the route chain matched.
pub fn record_resolution(matched: bool) {
    let outcome = if matched { "matched" } else { "unmatched" };
    metrics::counter!("router_resolutions_total", "outcome" => outcome).increment(1);
}

/// Record a queue expansion failure.
pub fn record_queue_not_found() {
    metrics::counter!("router_queue_not_found_total").increment(1);
}

/// Record a routing table swap.
pub fn record_reload() {
    metrics::counter!("router_reloads_total").increment(1);
}
