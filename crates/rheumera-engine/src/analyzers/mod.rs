//! Built-in analyzers, one per `MetricKind`.
//!
//! Each analyzer holds only immutable thresholds; adding a metric kind means
//! adding a variant here and listing it in the engine's analyzer set.

pub mod fatigue;
pub mod medication;
pub mod pain;
pub mod stiffness;

pub use fatigue::FatigueAnalyzer;
pub use medication::MedicationAnalyzer;
pub use pain::PainAnalyzer;
pub use stiffness::StiffnessAnalyzer;

#[cfg(test)]
pub(crate) fn metric(kind: rheumera_core::MetricKind, value: f64) -> rheumera_core::Metric {
    rheumera_core::Metric::now(kind, value, "p-test").unwrap()
}
