//! Line codec: one JSON metric per line.

use rheumera_core::error::{Result, RheumeraError};
use rheumera_core::model::Metric;

/// Decode one raw input line. Invalid UTF-8 is an `InvalidMetric` error like
/// any other malformed line.
pub fn decode_bytes(line: &[u8]) -> Result<Option<Metric>> {
    let line = std::str::from_utf8(line)
        .map_err(|e| RheumeraError::InvalidMetric(format!("line is not utf-8: {e}")))?;
    decode_line(line)
}

/// Decode one input line. Blank lines yield `Ok(None)`.
pub fn decode_line(line: &str) -> Result<Option<Metric>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| RheumeraError::InvalidMetric(format!("invalid metric json: {e}")))
}
