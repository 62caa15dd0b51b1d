//! Rheumera engine binary.
//!
//! - Loads strict YAML config (default `rheumera.yaml`, or the first argument)
//! - Builds the dispatch engine; duplicate analyzers abort startup
//! - Reads one JSON metric per line from stdin until EOF
//! - Alerts go to the tracing sink; counters are printed at the end

use std::process::ExitCode;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{fmt, EnvFilter};

use rheumera_core::error::Result;
use rheumera_engine::config;
use rheumera_engine::dispatch::DispatchEngine;
use rheumera_engine::ingest::Ingestor;
use rheumera_engine::sink::TracingSink;

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "rheumera-engine failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "rheumera.yaml".into());
    let cfg = config::load_from_file(&path)?;

    let engine = DispatchEngine::new(config::build_analyzers(&cfg), Arc::new(TracingSink::new()))?;
    let kinds: Vec<&str> = engine.registered_kinds().iter().map(|k| k.as_str()).collect();
    tracing::info!(config = %path, analyzers = ?kinds, "rheumera-engine starting");

    let ingestor = Ingestor::new(Arc::new(engine), cfg.ingest.clone());
    let report = ingestor.run(BufReader::new(tokio::io::stdin())).await?;

    tracing::info!(
        lines = report.lines,
        processed = report.processed,
        dropped = report.dropped,
        failed = report.failed,
        malformed = report.malformed,
        "input exhausted"
    );
    print!("{}", ingestor.metrics().render_prometheus());
    Ok(())
}
