//! Rheumera engine library entry.
//!
//! This crate wires analyzers, the dispatch engine, alert sinks, config
//! loading, and the stdin ingestion loop into a runnable stack. It is intended
//! to be consumed by the binary (`main.rs`) and by integration tests.

pub mod analyzers;
pub mod config;
pub mod dispatch;
pub mod ingest;
pub mod obs;
pub mod sink;

pub use dispatch::{Analyzer, DispatchEngine};
pub use sink::AlertSink;
