//! Metric wire-format vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;

use chrono::{TimeZone, Utc};
use rheumera_core::{Metric, MetricKind};

fn load(name: &str) -> String {
    fs::read_to_string(format!("tests/vectors/{name}")).unwrap()
}

#[test]
fn parse_pain_metric() {
    let m: Metric = serde_json::from_str(&load("metric_pain.json")).unwrap();
    assert_eq!(m.kind(), MetricKind::Pain);
    assert_eq!(m.value(), 9.0);
    assert_eq!(m.patient_id().as_str(), "patient-0042");
    assert_eq!(m.recorded_at(), Utc.with_ymd_and_hms(2024, 5, 1, 8, 15, 0).unwrap());
}

#[test]
fn offset_timestamps_normalize_to_utc() {
    let m: Metric = serde_json::from_str(&load("metric_medication.json")).unwrap();
    assert_eq!(m.kind(), MetricKind::Medication);
    assert_eq!(m.recorded_at(), Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap());
}

#[test]
fn unknown_kind_is_rejected() {
    let err = serde_json::from_str::<Metric>(&load("metric_unknown_kind.json")).unwrap_err();
    assert!(err.to_string().contains("unknown variant"), "{err}");
}

#[test]
fn extra_fields_are_rejected() {
    let err = serde_json::from_str::<Metric>(&load("metric_extra_field.json")).unwrap_err();
    assert!(err.to_string().contains("device"), "{err}");
}

#[test]
fn blank_patient_is_rejected() {
    let err = serde_json::from_str::<Metric>(&load("metric_blank_patient.json")).unwrap_err();
    assert!(err.to_string().contains("patient_id"), "{err}");
}

#[test]
fn serialized_metric_parses_back() {
    let m: Metric = serde_json::from_str(&load("metric_pain.json")).unwrap();
    let again: Metric = serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
    assert_eq!(again, m);
}
