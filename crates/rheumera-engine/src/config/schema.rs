use serde::Deserialize;

use rheumera_core::error::{Result, RheumeraError};
use rheumera_core::model::MetricKind;

use crate::analyzers::fatigue::{DEFAULT_FATIGUE_SEVERE, DEFAULT_FATIGUE_THRESHOLD};
use crate::analyzers::medication::{DEFAULT_CRITICAL_ADHERENCE, DEFAULT_MIN_ADHERENCE};
use crate::analyzers::pain::DEFAULT_PAIN_THRESHOLD;
use crate::analyzers::stiffness::DEFAULT_STIFFNESS_MINUTES;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub version: u32,

    pub analyzers: Vec<AnalyzerConfig>,

    #[serde(default)]
    pub ingest: IngestSection,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RheumeraError::UnsupportedVersion);
        }
        if self.analyzers.is_empty() {
            return Err(RheumeraError::InvalidConfig("analyzers must not be empty".into()));
        }
        for a in &self.analyzers {
            a.validate()?;
        }

        self.ingest.validate()?;

        Ok(())
    }
}

/// One analyzer entry, discriminated by `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum AnalyzerConfig {
    Pain {
        #[serde(default = "default_pain_threshold")]
        threshold: f64,
    },
    Fatigue {
        #[serde(default = "default_fatigue_threshold")]
        threshold: f64,
        #[serde(default = "default_fatigue_severe")]
        severe: f64,
    },
    Medication {
        #[serde(default = "default_min_adherence")]
        min_adherence: f64,
        #[serde(default = "default_critical_adherence")]
        critical_adherence: f64,
    },
    Stiffness {
        #[serde(default = "default_stiffness_minutes")]
        threshold_minutes: f64,
    },
}

impl AnalyzerConfig {
    pub fn kind(&self) -> MetricKind {
        match self {
            AnalyzerConfig::Pain { .. } => MetricKind::Pain,
            AnalyzerConfig::Fatigue { .. } => MetricKind::Fatigue,
            AnalyzerConfig::Medication { .. } => MetricKind::Medication,
            AnalyzerConfig::Stiffness { .. } => MetricKind::Stiffness,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            AnalyzerConfig::Pain { threshold } => {
                if !(0.0..=10.0).contains(&threshold) {
                    return Err(invalid("pain.threshold must be between 0 and 10"));
                }
            }
            AnalyzerConfig::Fatigue { threshold, severe } => {
                if !(0.0..=10.0).contains(&threshold) || !(0.0..=10.0).contains(&severe) {
                    return Err(invalid("fatigue thresholds must be between 0 and 10"));
                }
                if severe < threshold {
                    return Err(invalid("fatigue.severe must be >= fatigue.threshold"));
                }
            }
            AnalyzerConfig::Medication {
                min_adherence,
                critical_adherence,
            } => {
                if !(0.0..=1.0).contains(&min_adherence) || !(0.0..=1.0).contains(&critical_adherence) {
                    return Err(invalid("medication adherence levels must be between 0 and 1"));
                }
                if critical_adherence > min_adherence {
                    return Err(invalid(
                        "medication.critical_adherence must be <= medication.min_adherence",
                    ));
                }
            }
            AnalyzerConfig::Stiffness { threshold_minutes } => {
                if !threshold_minutes.is_finite() || threshold_minutes < 0.0 {
                    return Err(invalid("stiffness.threshold_minutes must be >= 0"));
                }
            }
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> RheumeraError {
    RheumeraError::InvalidConfig(msg.into())
}

fn default_pain_threshold() -> f64 {
    DEFAULT_PAIN_THRESHOLD
}
fn default_fatigue_threshold() -> f64 {
    DEFAULT_FATIGUE_THRESHOLD
}
fn default_fatigue_severe() -> f64 {
    DEFAULT_FATIGUE_SEVERE
}
fn default_min_adherence() -> f64 {
    DEFAULT_MIN_ADHERENCE
}
fn default_critical_adherence() -> f64 {
    DEFAULT_CRITICAL_ADHERENCE
}
fn default_stiffness_minutes() -> f64 {
    DEFAULT_STIFFNESS_MINUTES
}

/// Retry policy of the stdin ingestion loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngestSection {
    #[serde(default = "default_max_delivery_attempts")]
    pub max_delivery_attempts: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for IngestSection {
    fn default() -> Self {
        Self {
            max_delivery_attempts: default_max_delivery_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl IngestSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.max_delivery_attempts) {
            return Err(invalid("ingest.max_delivery_attempts must be between 1 and 10"));
        }
        if self.retry_backoff_ms > 10_000 {
            return Err(invalid("ingest.retry_backoff_ms must be <= 10000"));
        }
        Ok(())
    }
}

fn default_max_delivery_attempts() -> u32 {
    3
}
fn default_retry_backoff_ms() -> u64 {
    200
}
