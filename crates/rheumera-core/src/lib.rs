//! Rheumera core: the patient-metric data model and the error surface.
//!
//! This crate defines the value objects exchanged between the ingestion layer,
//! the dispatch engine, analyzers, and alert sinks. It intentionally carries no
//! runtime dependencies so it can be reused by any transport.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Invalid input surfaces as `RheumeraError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

pub use error::{
    DeliveryError, DispatchError, DuplicateAnalyzerError, ErrorCode, Result, RheumeraError,
};
pub use model::{Alert, Metric, MetricKind, PatientId, Severity};
