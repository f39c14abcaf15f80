//! JSON export and import of analysis results.
//!
//! The export is the service response verbatim, pretty-printed.

use std::path::Path;

use super::{ReportError, ReportResult};
use crate::api::AnalysisResult;

/// Default file name for JSON exports.
pub const DEFAULT_JSON_FILE: &str = "risk-analysis-result.json";

/// Serialize a result as pretty JSON.
pub fn export_json(result: &AnalysisResult) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Parse a previously exported result.
pub fn import_json(json: &str) -> ReportResult<AnalysisResult> {
    Ok(serde_json::from_str(json)?)
}

/// Write a result to a JSON file.
pub fn write_json(result: &AnalysisResult, path: &Path) -> ReportResult<()> {
    let json = export_json(result)?;
    std::fs::write(path, json).map_err(|e| ReportError::Io { path: path.to_path_buf(), source: e })?;
    tracing::info!(path = %path.display(), "Exported analysis as JSON");
    Ok(())
}

/// Read a result from a JSON file.
pub fn read_json(path: &Path) -> ReportResult<AnalysisResult> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ReportError::Io { path: path.to_path_buf(), source: e })?;
    import_json(&json)
}
