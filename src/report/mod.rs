//! Presentation and export of analysis results.
//!
//! - `summary` - derived metrics and chart data
//! - `json` - verbatim JSON export and import
//! - `text` - fixed-layout printable report

mod json;
mod summary;
mod text;

use std::path::PathBuf;

pub use json::{export_json, import_json, read_json, write_json, DEFAULT_JSON_FILE};
pub use summary::{
    category_color, category_counts, CategoryCount, DistributionSlice, ReportSummary, ScoreBar,
};
pub use text::{render_text_report, report_file_name, PAGE_LINES, REPORT_WIDTH};

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Error types for report operations.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Invalid analysis JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
}
