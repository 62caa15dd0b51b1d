//! Metric kinds and the validated `Metric` value object.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RheumeraError};

/// Closed set of patient-reported metric categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Pain on a 0-10 numeric rating scale.
    Pain,
    /// Fatigue on a 0-10 numeric rating scale.
    Fatigue,
    /// Medication adherence ratio, doses taken / doses prescribed.
    Medication,
    /// Morning stiffness duration in minutes.
    Stiffness,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Pain,
        MetricKind::Fatigue,
        MetricKind::Medication,
        MetricKind::Stiffness,
    ];

    /// Stable name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Pain => "pain",
            MetricKind::Fatigue => "fatigue",
            MetricKind::Medication => "medication",
            MetricKind::Stiffness => "stiffness",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque patient identifier. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PatientId(String);

impl PatientId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RheumeraError::InvalidMetric("patient_id must not be empty".into()));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PatientId {
    type Error = RheumeraError;

    fn try_from(s: String) -> Result<Self> {
        Self::new(s)
    }
}

impl From<PatientId> for String {
    fn from(id: PatientId) -> Self {
        id.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single patient-reported measurement.
///
/// Immutable once built: the ingestion layer creates it, the engine and the
/// analyzers only read it. `value` is always finite; its meaningful range
/// depends on `kind` and is interpreted by the matching analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MetricRepr")]
pub struct Metric {
    kind: MetricKind,
    value: f64,
    patient_id: PatientId,
    recorded_at: DateTime<Utc>,
}

impl Metric {
    pub fn new(
        kind: MetricKind,
        value: f64,
        patient_id: PatientId,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self> {
        if !value.is_finite() {
            return Err(RheumeraError::InvalidMetric(format!(
                "{kind} value must be finite, got {value}"
            )));
        }
        Ok(Self {
            kind,
            value,
            patient_id,
            recorded_at,
        })
    }

    /// Convenience constructor stamped with the current time.
    pub fn now(kind: MetricKind, value: f64, patient_id: impl Into<String>) -> Result<Self> {
        Self::new(kind, value, PatientId::new(patient_id)?, Utc::now())
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

// Wire shape; converted through `Metric::new` so deserialized metrics are validated.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct MetricRepr {
    kind: MetricKind,
    value: f64,
    patient_id: PatientId,
    recorded_at: DateTime<Utc>,
}

impl TryFrom<MetricRepr> for Metric {
    type Error = RheumeraError;

    fn try_from(r: MetricRepr) -> Result<Self> {
        Metric::new(r.kind, r.value, r.patient_id, r.recorded_at)
    }
}
