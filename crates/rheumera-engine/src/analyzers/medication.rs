use rheumera_core::model::{Alert, Metric, MetricKind, Severity};

use crate::dispatch::Analyzer;

pub const DEFAULT_MIN_ADHERENCE: f64 = 0.8;
pub const DEFAULT_CRITICAL_ADHERENCE: f64 = 0.5;

/// Compliance check on the adherence ratio (doses taken / doses prescribed).
///
/// Below `min_adherence` is Medium, below `critical_adherence` is High.
#[derive(Debug, Clone)]
pub struct MedicationAnalyzer {
    min_adherence: f64,
    critical_adherence: f64,
}

impl MedicationAnalyzer {
    pub fn new(min_adherence: f64, critical_adherence: f64) -> Self {
        Self {
            min_adherence,
            critical_adherence,
        }
    }
}

impl Default for MedicationAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ADHERENCE, DEFAULT_CRITICAL_ADHERENCE)
    }
}

impl Analyzer for MedicationAnalyzer {
    fn kind(&self) -> MetricKind {
        MetricKind::Medication
    }

    fn analyze(&self, metric: &Metric) -> Option<Alert> {
        let ratio = metric.value();
        let pct = |r: f64| (r * 100.0).round();
        if ratio < self.critical_adherence {
            Some(Alert::new(
                metric,
                Severity::High,
                format!(
                    "adherence {}% below critical level {}%",
                    pct(ratio),
                    pct(self.critical_adherence)
                ),
            ))
        } else if ratio < self.min_adherence {
            Some(Alert::new(
                metric,
                Severity::Medium,
                format!(
                    "adherence {}% below minimum {}%",
                    pct(ratio),
                    pct(self.min_adherence)
                ),
            ))
        } else {
            None
        }
    }
}
