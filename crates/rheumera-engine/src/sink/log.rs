use async_trait::async_trait;

use rheumera_core::error::DeliveryError;
use rheumera_core::model::{Alert, Severity};

use super::AlertSink;

/// Writes every alert as a structured `tracing` event. High severity is
/// logged at `error`, everything else at `warn`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for TracingSink {
    async fn deliver(&self, alert: Alert) -> Result<(), DeliveryError> {
        let m = &alert.metric;
        match alert.severity {
            Severity::High => tracing::error!(
                patient = %m.patient_id(),
                kind = %m.kind(),
                value = m.value(),
                recorded_at = %m.recorded_at(),
                severity = %alert.severity,
                reason = %alert.reason,
                "patient alert"
            ),
            Severity::Medium | Severity::Low => tracing::warn!(
                patient = %m.patient_id(),
                kind = %m.kind(),
                value = m.value(),
                recorded_at = %m.recorded_at(),
                severity = %alert.severity,
                reason = %alert.reason,
                "patient alert"
            ),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rheumera_core::model::{Metric, MetricKind};

    use super::*;

    #[tokio::test]
    async fn accepts_every_severity() {
        let sink = TracingSink::new();
        let m = Metric::now(MetricKind::Stiffness, 20.0, "p-1").unwrap();
        for severity in [Severity::Low, Severity::Medium, Severity::High] {
            let alert = Alert::new(&m, severity, "external rule");
            assert_eq!(sink.deliver(alert).await, Ok(()));
        }
    }
}
