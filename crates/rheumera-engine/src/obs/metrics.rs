//! Ingestion counters for the stdin pipeline.
//!
//! Counters and histograms with dynamic labels backed by `DashMap`, so
//! concurrent ingestion tasks can record without a lock. Labels are flattened
//! into sorted key vectors to keep deterministic ordering. Histogram buckets are
//! fixed in microseconds to avoid floating point math.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &[(String, String)]) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum across all label sets.
    pub fn total(&self) -> u64 {
        self.map.iter().map(|r| r.value().load(Ordering::Relaxed)).sum()
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (labels, val) in rows {
            if labels.is_empty() {
                let _ = writeln!(out, "{} {}", name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
            }
        }
    }
}

// 10us, 50us, 100us, 500us, 1ms, 5ms, 10ms, 100ms, 1s
const BUCKETS_MICROS: [u64; 9] = [10, 50, 100, 500, 1_000, 5_000, 10_000, 100_000, 1_000_000];

#[derive(Default)]
struct AtomicHistogram {
    count: AtomicU64,
    sum: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl AtomicHistogram {
    fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot {
            count: self.count.load(Ordering::Relaxed),
            sum: self.sum.load(Ordering::Relaxed),
            buckets: std::array::from_fn(|i| self.buckets[i].load(Ordering::Relaxed)),
        }
    }
}

struct HistogramSnapshot {
    count: u64,
    sum: u64,
    buckets: [u64; 9],
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Vec<(String, String)>, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets (microsecond scale).
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(micros, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: microseconds).
    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} histogram", name);
        let mut rows: Vec<(String, HistogramSnapshot)> = self
            .map
            .iter()
            .map(|r| (label_str(r.key()), r.value().snapshot()))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (labels, hist) in rows {
            let prefix = if labels.is_empty() {
                String::new()
            } else {
                format!("{},", labels)
            };

            for (&le, count) in BUCKETS_MICROS.iter().zip(hist.buckets) {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, hist.count);
            let _ = writeln!(out, "{}_sum{{{}}} {}", name, labels, hist.sum);
            let _ = writeln!(out, "{}_count{{{}}} {}", name, labels, hist.count);
        }
    }
}

#[derive(Default)]
pub struct IngestMetrics {
    /// Metrics handed to the engine, by kind.
    pub metrics_total: CounterVec,
    /// `process` failures after retries, by error code.
    pub dispatch_errors: CounterVec,
    /// Lines that failed to decode.
    pub decode_errors: CounterVec,
    /// Extra `process` attempts after retryable delivery failures.
    pub delivery_retries: CounterVec,
    /// Wall time of `process`, by kind.
    pub dispatch_duration: HistogramVec,
}

impl IngestMetrics {
    pub fn render_prometheus(&self) -> String {
        let mut out = String::new();
        self.metrics_total.render("rheumera_metrics_total", &mut out);
        self.dispatch_errors.render("rheumera_dispatch_errors_total", &mut out);
        self.decode_errors.render("rheumera_decode_errors_total", &mut out);
        self.delivery_retries.render("rheumera_delivery_retries_total", &mut out);
        self.dispatch_duration.render("rheumera_dispatch_duration_us", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_order_does_not_matter() {
        let c = CounterVec::default();
        c.inc(&[("kind", "pain"), ("src", "stdin")]);
        c.inc(&[("src", "stdin"), ("kind", "pain")]);
        assert_eq!(c.get(&[("kind", "pain"), ("src", "stdin")]), 2);
        assert_eq!(c.total(), 2);
    }

    #[test]
    fn renders_prometheus_text() {
        let m = IngestMetrics::default();
        m.metrics_total.inc(&[("kind", "pain")]);
        m.decode_errors.inc(&[]);
        m.dispatch_duration.observe(&[("kind", "pain")], Duration::from_micros(42));

        let out = m.render_prometheus();
        assert!(out.contains("rheumera_metrics_total{kind=\"pain\"} 1"));
        assert!(out.contains("rheumera_decode_errors_total 1"));
        assert!(out.contains("rheumera_dispatch_duration_us_bucket{kind=\"pain\",le=\"50\"} 1"));
        assert!(out.contains("rheumera_dispatch_duration_us_bucket{kind=\"pain\",le=\"10\"} 0"));
        assert!(out.contains("rheumera_dispatch_duration_us_count{kind=\"pain\"} 1"));
    }

    #[test]
    fn histogram_rows_render_sorted() {
        let h = HistogramVec::default();
        for kind in ["stiffness", "fatigue", "pain", "medication"] {
            h.observe(&[("kind", kind)], Duration::from_micros(5));
        }
        let mut out = String::new();
        h.render("d", &mut out);

        let kinds: Vec<&str> = out
            .lines()
            .filter(|l| l.starts_with("d_count{"))
            .map(|l| l.split('"').nth(1).unwrap())
            .collect();
        assert_eq!(kinds, vec!["fatigue", "medication", "pain", "stiffness"]);
    }
}
