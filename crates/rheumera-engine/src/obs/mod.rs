//! Lightweight in-process counters for the ingestion loop.
//!
//! Stored as atomics and rendered in Prometheus text format when the run ends.
//! The dispatch engine itself records nothing.

pub mod metrics;
