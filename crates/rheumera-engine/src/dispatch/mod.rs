//! Dispatch module exports.
//!
//! Re-exports the engine and the analyzer capability so downstream consumers can
//! depend on this module directly.

pub mod engine;

pub use engine::{Analyzer, DispatchEngine, DispatchEngineBuilder};
