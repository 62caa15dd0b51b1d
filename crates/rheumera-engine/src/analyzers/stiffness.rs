use rheumera_core::model::{Alert, Metric, MetricKind, Severity};

use crate::dispatch::Analyzer;

pub const DEFAULT_STIFFNESS_MINUTES: f64 = 60.0;

/// Morning stiffness lasting longer than `threshold_minutes` suggests active
/// inflammation; alerts Medium.
#[derive(Debug, Clone)]
pub struct StiffnessAnalyzer {
    threshold_minutes: f64,
}

impl StiffnessAnalyzer {
    pub fn new(threshold_minutes: f64) -> Self {
        Self { threshold_minutes }
    }
}

impl Default for StiffnessAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_STIFFNESS_MINUTES)
    }
}

impl Analyzer for StiffnessAnalyzer {
    fn kind(&self) -> MetricKind {
        MetricKind::Stiffness
    }

    fn analyze(&self, metric: &Metric) -> Option<Alert> {
        let minutes = metric.value();
        (minutes > self.threshold_minutes).then(|| {
            Alert::new(
                metric,
                Severity::Medium,
                format!(
                    "morning stiffness {minutes} min above {} min",
                    self.threshold_minutes
                ),
            )
        })
    }
}
