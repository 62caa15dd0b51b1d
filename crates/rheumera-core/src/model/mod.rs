//! Patient metric data model.
//!
//! - `Metric`: immutable, validated measurement reported by a patient.
//! - `Alert`: threshold breach tied to the metric that triggered it.
//!
//! Deserialization funnels through the same validation as the constructors, so
//! a `Metric` that exists is always well-formed.

pub mod alert;
pub mod metric;

pub use alert::{Alert, Severity};
pub use metric::{Metric, MetricKind, PatientId};
