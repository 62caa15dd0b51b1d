//! Engine config loader (strict parsing).

pub mod schema;

use std::fs;
use std::sync::Arc;

use rheumera_core::error::{Result, RheumeraError};

use crate::analyzers::{FatigueAnalyzer, MedicationAnalyzer, PainAnalyzer, StiffnessAnalyzer};
use crate::dispatch::Analyzer;

pub use schema::{AnalyzerConfig, EngineConfig, IngestSection};

pub fn load_from_file(path: &str) -> Result<EngineConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RheumeraError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<EngineConfig> {
    let cfg: EngineConfig = serde_yaml::from_str(s)
        .map_err(|e| RheumeraError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Analyzer set described by `cfg`, in declaration order. Duplicate kinds are
/// passed through untouched; `DispatchEngine::new` rejects them.
pub fn build_analyzers(cfg: &EngineConfig) -> Vec<Arc<dyn Analyzer>> {
    cfg.analyzers
        .iter()
        .map(|a| -> Arc<dyn Analyzer> {
            match *a {
                AnalyzerConfig::Pain { threshold } => Arc::new(PainAnalyzer::new(threshold)),
                AnalyzerConfig::Fatigue { threshold, severe } => {
                    Arc::new(FatigueAnalyzer::new(threshold, severe))
                }
                AnalyzerConfig::Medication {
                    min_adherence,
                    critical_adherence,
                } => Arc::new(MedicationAnalyzer::new(min_adherence, critical_adherence)),
                AnalyzerConfig::Stiffness { threshold_minutes } => {
                    Arc::new(StiffnessAnalyzer::new(threshold_minutes))
                }
            }
        })
        .collect()
}
