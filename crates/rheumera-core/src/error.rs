//! Error taxonomy shared across Rheumera crates.

use thiserror::Error;

use crate::model::MetricKind;

/// Stable error codes (used as log fields and counter labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Metric failed validation.
    InvalidMetric,
    /// Configuration rejected.
    InvalidConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Two analyzers claimed the same kind.
    DuplicateAnalyzer,
    /// No analyzer registered for the metric's kind.
    UnsupportedMetricKind,
    /// Alert sink failed.
    DeliveryFailed,
    /// I/O failure outside the engine.
    Io,
}

impl ErrorCode {
    /// String representation used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidMetric => "INVALID_METRIC",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::DuplicateAnalyzer => "DUPLICATE_ANALYZER",
            ErrorCode::UnsupportedMetricKind => "UNSUPPORTED_METRIC_KIND",
            ErrorCode::DeliveryFailed => "DELIVERY_FAILED",
            ErrorCode::Io => "IO",
        }
    }
}

/// Two analyzers declared the same metric kind. Raised while building the
/// engine, before it accepts any traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("duplicate analyzer registered for metric kind `{kind}`")]
pub struct DuplicateAnalyzerError {
    pub kind: MetricKind,
}

/// Failure reported by an alert sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The sink is gone for good (receiver dropped, shut down).
    #[error("alert sink closed")]
    Closed,
    /// Transient failure; the same alert may succeed later.
    #[error("alert sink unavailable: {0}")]
    Unavailable(String),
    /// The sink refused this alert.
    #[error("alert rejected: {0}")]
    Rejected(String),
}

/// Per-call failure of `DispatchEngine::process`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no analyzer registered for metric kind `{0}`")]
    UnsupportedMetricKind(MetricKind),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl DispatchError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DispatchError::UnsupportedMetricKind(_) => ErrorCode::UnsupportedMetricKind,
            DispatchError::Delivery(_) => ErrorCode::DeliveryFailed,
        }
    }

    /// Whether submitting the same metric again can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Delivery(DeliveryError::Unavailable(_)))
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, RheumeraError>;

/// Umbrella error for startup and ingestion paths.
#[derive(Debug, Error)]
pub enum RheumeraError {
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error(transparent)]
    DuplicateAnalyzer(#[from] DuplicateAnalyzerError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl RheumeraError {
    /// Map to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            RheumeraError::InvalidMetric(_) => ErrorCode::InvalidMetric,
            RheumeraError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            RheumeraError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            RheumeraError::DuplicateAnalyzer(_) => ErrorCode::DuplicateAnalyzer,
            RheumeraError::Dispatch(e) => e.code(),
            RheumeraError::Io(_) => ErrorCode::Io,
        }
    }
}
