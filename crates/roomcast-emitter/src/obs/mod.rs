//! Lightweight in-process publish counters.
//!
//! Counters are stored as atomics and rendered in Prometheus text format by
//! whoever embeds the emitter.

pub mod metrics;

pub use metrics::EmitterMetrics;
