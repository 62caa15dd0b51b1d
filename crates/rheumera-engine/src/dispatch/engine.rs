use std::collections::HashMap;
use std::sync::Arc;

use rheumera_core::error::{DispatchError, DuplicateAnalyzerError};
use rheumera_core::model::{Alert, Metric, MetricKind};

use crate::sink::AlertSink;

/// Evaluation rule for exactly one metric kind.
///
/// Implementations must be pure: `analyze` depends only on the metric and on
/// thresholds fixed at construction. The engine relies on this to dispatch
/// from many tasks at once without locking. `analyze` is only ever called with
/// metrics whose kind equals `kind()`.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> MetricKind;
    fn analyze(&self, metric: &Metric) -> Option<Alert>;
}

/// Immutable `MetricKind -> Analyzer` registry plus the sink alerts go to.
///
/// Built once at startup; there is no way to register analyzers afterwards, so
/// `&DispatchEngine` (or `Arc<DispatchEngine>`) can be shared freely.
pub struct DispatchEngine {
    analyzers: HashMap<MetricKind, Arc<dyn Analyzer>>,
    sink: Arc<dyn AlertSink>,
}

impl DispatchEngine {
    /// Build the registry from `analyzers`, in order.
    ///
    /// Fails if two analyzers declare the same kind; the first duplicate
    /// encountered is reported.
    pub fn new<I>(analyzers: I, sink: Arc<dyn AlertSink>) -> Result<Self, DuplicateAnalyzerError>
    where
        I: IntoIterator<Item = Arc<dyn Analyzer>>,
    {
        let mut map: HashMap<MetricKind, Arc<dyn Analyzer>> = HashMap::new();
        for analyzer in analyzers {
            let kind = analyzer.kind();
            if map.insert(kind, analyzer).is_some() {
                return Err(DuplicateAnalyzerError { kind });
            }
        }
        Ok(Self {
            analyzers: map,
            sink,
        })
    }

    pub fn builder() -> DispatchEngineBuilder {
        DispatchEngineBuilder::default()
    }

    pub fn supports(&self, kind: MetricKind) -> bool {
        self.analyzers.contains_key(&kind)
    }

    /// Registered kinds, sorted.
    pub fn registered_kinds(&self) -> Vec<MetricKind> {
        let mut kinds: Vec<MetricKind> = self.analyzers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Route `metric` to its analyzer without delivering anything.
    pub fn evaluate(&self, metric: &Metric) -> Result<Option<Alert>, DispatchError> {
        let kind = metric.kind();
        let analyzer = self
            .analyzers
            .get(&kind)
            .ok_or(DispatchError::UnsupportedMetricKind(kind))?;
        Ok(analyzer.analyze(metric))
    }

    /// Route `metric` to its analyzer and hand any resulting alert to the sink.
    ///
    /// At most one `deliver` call per invocation, awaited before returning, so
    /// alerts from sequential calls reach the sink in submission order.
    pub async fn process(&self, metric: &Metric) -> Result<(), DispatchError> {
        if let Some(alert) = self.evaluate(metric)? {
            self.sink.deliver(alert).await?;
        }
        Ok(())
    }
}

/// Incremental construction with the same duplicate check as `DispatchEngine::new`.
#[derive(Default)]
pub struct DispatchEngineBuilder {
    analyzers: Vec<Arc<dyn Analyzer>>,
}

impl DispatchEngineBuilder {
    pub fn analyzer<A: Analyzer + 'static>(mut self, analyzer: A) -> Self {
        self.analyzers.push(Arc::new(analyzer));
        self
    }

    pub fn analyzers<I>(mut self, analyzers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Analyzer>>,
    {
        self.analyzers.extend(analyzers);
        self
    }

    pub fn build(self, sink: Arc<dyn AlertSink>) -> Result<DispatchEngine, DuplicateAnalyzerError> {
        DispatchEngine::new(self.analyzers, sink)
    }
}
