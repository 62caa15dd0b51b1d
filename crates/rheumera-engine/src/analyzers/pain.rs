use rheumera_core::model::{Alert, Metric, MetricKind, Severity};

use crate::dispatch::Analyzer;

pub const DEFAULT_PAIN_THRESHOLD: f64 = 8.0;

/// Alerts (High) when reported pain exceeds the threshold. The threshold
/// itself does not alert.
#[derive(Debug, Clone)]
pub struct PainAnalyzer {
    threshold: f64,
}

impl PainAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for PainAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_PAIN_THRESHOLD)
    }
}

impl Analyzer for PainAnalyzer {
    fn kind(&self) -> MetricKind {
        MetricKind::Pain
    }

    fn analyze(&self, metric: &Metric) -> Option<Alert> {
        let v = metric.value();
        (v > self.threshold).then(|| {
            Alert::new(
                metric,
                Severity::High,
                format!("pain {v} above threshold {}", self.threshold),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::metric;

    #[test]
    fn boundary_is_exclusive() {
        let a = PainAnalyzer::default();
        assert!(a.analyze(&metric(MetricKind::Pain, 8.0)).is_none());

        let alert = a.analyze(&metric(MetricKind::Pain, 8.0001)).unwrap();
        assert_eq!(alert.severity, Severity::High);
        assert_eq!(alert.metric.value(), 8.0001);

        let next_up = f64::from_bits(8.0f64.to_bits() + 1);
        assert!(a.analyze(&metric(MetricKind::Pain, next_up)).is_some());
    }

    #[test]
    fn repeated_analysis_is_identical() {
        let a = PainAnalyzer::default();
        let m = metric(MetricKind::Pain, 9.5);
        assert_eq!(a.analyze(&m), a.analyze(&m));

        let quiet = metric(MetricKind::Pain, 1.0);
        assert_eq!(a.analyze(&quiet), None);
        assert_eq!(a.analyze(&quiet), None);
    }

    #[test]
    fn out_of_scale_values_still_evaluate() {
        let a = PainAnalyzer::default();
        assert!(a.analyze(&metric(MetricKind::Pain, 12.0)).is_some());
        assert!(a.analyze(&metric(MetricKind::Pain, -1.0)).is_none());
    }
}
