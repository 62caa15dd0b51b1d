//! Line-oriented ingestion loop.
//!
//! Responsibilities:
//! - Decode one JSON metric per line (malformed lines are counted, not fatal)
//! - Hand each metric to the dispatch engine, one at a time
//! - Decide what to do with dispatch failures:
//!   - unsupported kind: drop with a warning
//!   - sink unavailable: retry with a fixed backoff, then give up on that metric
//!   - sink rejected: give up on that metric
//!   - sink closed: stop the run

pub mod codec;

use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::Duration;

use rheumera_core::error::{DeliveryError, DispatchError, Result};
use rheumera_core::model::Metric;

use crate::config::IngestSection;
use crate::dispatch::DispatchEngine;
use crate::obs::metrics::IngestMetrics;

/// What happened to one submitted metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Analyzed, and any alert was delivered.
    Processed,
    /// No analyzer for its kind.
    Dropped,
    /// Delivery failed for good; the alert is lost.
    Failed(DispatchError),
}

/// Totals for one `run`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub lines: u64,
    pub processed: u64,
    pub dropped: u64,
    pub failed: u64,
    pub malformed: u64,
}

pub struct Ingestor {
    engine: Arc<DispatchEngine>,
    policy: IngestSection,
    metrics: Arc<IngestMetrics>,
}

impl Ingestor {
    pub fn new(engine: Arc<DispatchEngine>, policy: IngestSection) -> Self {
        Self {
            engine,
            policy,
            metrics: Arc::new(IngestMetrics::default()),
        }
    }

    pub fn metrics(&self) -> Arc<IngestMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Submit one metric, applying the retry policy.
    ///
    /// Returns `Err` only when the sink is closed; every other failure is
    /// reported through `Disposition`.
    pub async fn submit(&self, metric: &Metric) -> Result<Disposition> {
        let kind = metric.kind().as_str();
        self.metrics.metrics_total.inc(&[("kind", kind)]);

        let mut attempt = 1;
        loop {
            let started = Instant::now();
            let res = self.engine.process(metric).await;
            self.metrics
                .dispatch_duration
                .observe(&[("kind", kind)], started.elapsed());

            let err = match res {
                Ok(()) => return Ok(Disposition::Processed),
                Err(e) => e,
            };

            if err.is_retryable() && attempt < self.policy.max_delivery_attempts {
                tracing::debug!(
                    patient = %metric.patient_id(),
                    kind,
                    attempt,
                    error = %err,
                    "alert delivery failed, retrying"
                );
                self.metrics.delivery_retries.inc(&[("kind", kind)]);
                attempt += 1;
                tokio::time::sleep(Duration::from_millis(self.policy.retry_backoff_ms)).await;
                continue;
            }

            self.metrics
                .dispatch_errors
                .inc(&[("code", err.code().as_str())]);

            return match err {
                DispatchError::UnsupportedMetricKind(_) => {
                    tracing::warn!(
                        patient = %metric.patient_id(),
                        kind,
                        code = err.code().as_str(),
                        "no analyzer for metric kind, dropping"
                    );
                    Ok(Disposition::Dropped)
                }
                DispatchError::Delivery(DeliveryError::Closed) => Err(err.into()),
                DispatchError::Delivery(_) => {
                    tracing::error!(
                        patient = %metric.patient_id(),
                        kind,
                        attempts = attempt,
                        error = %err,
                        "alert delivery failed, giving up"
                    );
                    Ok(Disposition::Failed(err))
                }
            };
        }
    }

    /// Read metrics from `reader` until EOF.
    pub async fn run<R>(&self, mut reader: R) -> Result<IngestReport>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut report = IngestReport::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            report.lines += 1;
            let metric = match codec::decode_bytes(&buf) {
                Ok(Some(m)) => m,
                Ok(None) => continue,
                Err(e) => {
                    report.malformed += 1;
                    self.metrics.decode_errors.inc(&[]);
                    tracing::warn!(line = report.lines, error = %e, "skipping malformed line");
                    continue;
                }
            };

            match self.submit(&metric).await? {
                Disposition::Processed => report.processed += 1,
                Disposition::Dropped => report.dropped += 1,
                Disposition::Failed(_) => report.failed += 1,
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use rheumera_core::model::{Alert, MetricKind};

    use super::*;
    use crate::analyzers::{FatigueAnalyzer, PainAnalyzer};
    use crate::sink::{AlertSink, ChannelSink};

    fn policy(attempts: u32) -> IngestSection {
        IngestSection {
            max_delivery_attempts: attempts,
            retry_backoff_ms: 0,
        }
    }

    /// Fails the first `failures` deliveries, then succeeds.
    struct Flaky {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl AlertSink for Flaky {
        async fn deliver(&self, _alert: Alert) -> std::result::Result<(), DeliveryError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(DeliveryError::Unavailable(format!("attempt {n}")))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct Refusing {
        calls: AtomicU32,
    }

    #[async_trait]
    impl AlertSink for Refusing {
        async fn deliver(&self, _alert: Alert) -> std::result::Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(DeliveryError::Rejected("unknown patient".into()))
        }
    }

    fn engine_with(sink: Arc<dyn AlertSink>) -> Arc<DispatchEngine> {
        Arc::new(
            DispatchEngine::builder()
                .analyzer(PainAnalyzer::default())
                .analyzer(FatigueAnalyzer::default())
                .build(sink)
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn run_counts_every_outcome() {
        let (sink, mut rx) = ChannelSink::unbounded();
        let ingestor = Ingestor::new(engine_with(Arc::new(sink)), policy(3));

        let input = concat!(
            r#"{"kind":"pain","value":9,"patient_id":"p-1","recorded_at":"2024-05-01T08:00:00Z"}"#, "\n",
            "\n",
            "not json\n",
            r#"{"kind":"stiffness","value":90,"patient_id":"p-1","recorded_at":"2024-05-01T08:01:00Z"}"#, "\n",
            r#"{"kind":"fatigue","value":2,"patient_id":"p-2","recorded_at":"2024-05-01T08:02:00Z"}"#, "\n",
        );

        let report = ingestor.run(input.as_bytes()).await.unwrap();
        assert_eq!(
            report,
            IngestReport {
                lines: 5,
                processed: 2,
                dropped: 1,
                failed: 0,
                malformed: 1,
            }
        );

        let alert = rx.recv().await.unwrap();
        assert_eq!(alert.metric.kind(), MetricKind::Pain);
        assert!(rx.try_recv().is_err());

        let m = ingestor.metrics();
        assert_eq!(m.metrics_total.total(), 3);
        assert_eq!(m.dispatch_errors.get(&[("code", "UNSUPPORTED_METRIC_KIND")]), 1);
        assert_eq!(m.decode_errors.total(), 1);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_skipped() {
        let (sink, mut rx) = ChannelSink::unbounded();
        let ingestor = Ingestor::new(engine_with(Arc::new(sink)), policy(3));

        let mut input = Vec::new();
        input.extend_from_slice(
            br#"{"kind":"pain","value":9,"patient_id":"p-1","recorded_at":"2024-05-01T08:00:00Z"}"#,
        );
        input.push(b'\n');
        input.extend_from_slice(b"\xff\xfe garbage\n");
        input.extend_from_slice(
            br#"{"kind":"pain","value":10,"patient_id":"p-2","recorded_at":"2024-05-01T08:01:00Z"}"#,
        );

        let report = ingestor.run(&input[..]).await.unwrap();
        assert_eq!(report.lines, 3);
        assert_eq!(report.processed, 2);
        assert_eq!(report.malformed, 1);
        assert_eq!(ingestor.metrics().decode_errors.total(), 1);

        assert_eq!(rx.recv().await.unwrap().metric.value(), 9.0);
        assert_eq!(rx.recv().await.unwrap().metric.value(), 10.0);
    }

    #[tokio::test]
    async fn rejected_alert_fails_without_retry() {
        let sink = Arc::new(Refusing::default());
        let ingestor = Ingestor::new(engine_with(sink.clone()), policy(3));

        let m = Metric::now(MetricKind::Pain, 10.0, "p-1").unwrap();
        let d = ingestor.submit(&m).await.unwrap();
        assert!(matches!(d, Disposition::Failed(DispatchError::Delivery(DeliveryError::Rejected(_)))));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ingestor.metrics().delivery_retries.total(), 0);
        assert_eq!(ingestor.metrics().dispatch_errors.get(&[("code", "DELIVERY_FAILED")]), 1);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let sink = Arc::new(Flaky {
            failures: 2,
            calls: AtomicU32::new(0),
        });
        let ingestor = Ingestor::new(engine_with(sink.clone()), policy(3));

        let m = Metric::now(MetricKind::Pain, 10.0, "p-1").unwrap();
        assert_eq!(ingestor.submit(&m).await.unwrap(), Disposition::Processed);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
        assert_eq!(ingestor.metrics().delivery_retries.total(), 2);
        assert_eq!(ingestor.metrics().dispatch_duration.count(&[("kind", "pain")]), 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let sink = Arc::new(Flaky {
            failures: 10,
            calls: AtomicU32::new(0),
        });
        let ingestor = Ingestor::new(engine_with(sink.clone()), policy(2));

        let m = Metric::now(MetricKind::Pain, 10.0, "p-1").unwrap();
        let d = ingestor.submit(&m).await.unwrap();
        assert!(matches!(d, Disposition::Failed(DispatchError::Delivery(DeliveryError::Unavailable(_)))));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn closed_sink_stops_the_run() {
        let (sink, rx) = ChannelSink::unbounded();
        drop(rx);
        let ingestor = Ingestor::new(engine_with(Arc::new(sink)), policy(3));

        let input = concat!(
            r#"{"kind":"fatigue","value":1,"patient_id":"p-1","recorded_at":"2024-05-01T08:00:00Z"}"#, "\n",
            r#"{"kind":"pain","value":9,"patient_id":"p-1","recorded_at":"2024-05-01T08:01:00Z"}"#, "\n",
        );
        let err = ingestor.run(input.as_bytes()).await.unwrap_err();
        assert_eq!(err.code().as_str(), "DELIVERY_FAILED");
    }
}
