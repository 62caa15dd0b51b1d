use std::fmt;

use serde::Serialize;

use super::metric::Metric;

/// Alert urgency. Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational. None of the built-in analyzers emit it; it is reserved
    /// for analyzers registered from outside `rheumera-engine`.
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Threshold breach raised by an analyzer for one metric.
///
/// Alerts are transient: the analyzer builds one, the engine hands it to the
/// sink by value and keeps nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub metric: Metric,
    pub severity: Severity,
    pub reason: String,
}

impl Alert {
    pub fn new(metric: &Metric, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            metric: metric.clone(),
            severity,
            reason: reason.into(),
        }
    }
}
