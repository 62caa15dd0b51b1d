use rheumera_core::model::{Alert, Metric, MetricKind, Severity};

use crate::dispatch::Analyzer;

pub const DEFAULT_FATIGUE_THRESHOLD: f64 = 7.0;
pub const DEFAULT_FATIGUE_SEVERE: f64 = 9.0;

/// Two-tier fatigue check: above `threshold` is Medium, above `severe` is High.
#[derive(Debug, Clone)]
pub struct FatigueAnalyzer {
    threshold: f64,
    severe: f64,
}

impl FatigueAnalyzer {
    pub fn new(threshold: f64, severe: f64) -> Self {
        Self { threshold, severe }
    }
}

impl Default for FatigueAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_FATIGUE_THRESHOLD, DEFAULT_FATIGUE_SEVERE)
    }
}

impl Analyzer for FatigueAnalyzer {
    fn kind(&self) -> MetricKind {
        MetricKind::Fatigue
    }

    fn analyze(&self, metric: &Metric) -> Option<Alert> {
        let v = metric.value();
        if v > self.severe {
            Some(Alert::new(
                metric,
                Severity::High,
                format!("fatigue {v} above severe level {}", self.severe),
            ))
        } else if v > self.threshold {
            Some(Alert::new(
                metric,
                Severity::Medium,
                format!("fatigue {v} above threshold {}", self.threshold),
            ))
        } else {
            None
        }
    }
}
