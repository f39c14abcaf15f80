//! # RiskSight
//!
//! AI business-risk analysis from the terminal.
//!
//! RiskSight uploads a business document to the analysis service, extracts
//! its text, asks the service to identify risks, and renders the resulting
//! report as a summary, a printable text report, or raw JSON.
//!
//! ## Features
//!
//! - **Validation**: PDF, DOCX, DOC and TXT files up to 10MB, checked locally
//! - **Workflow Store**: `idle → extracting → extracted → analyzing → analyzed`
//! - **Reports**: score chart, severity distribution, per-risk details
//! - **Export**: lossless JSON and fixed-layout text
//!
//! ## Quick Start
//!
//! ```bash
//! export RISKSIGHT_API_BASE_URL=https://risk.example.com/api/v1
//! export RISKSIGHT_API_KEY=...
//!
//! risksight analyze meeting.txt --industry technology --scale startup
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod api;
pub mod core;
pub mod document;
pub mod report;
pub mod workflow;

pub use api::{
    AnalysisRequest, AnalysisResult, ApiClient, ApiError, ExtractedText, HttpRiskAnalysisService,
    RiskAnalysisService, RiskItem, Severity,
};
pub use crate::core::Config;
pub use document::{validate_file, FileValidationError, UploadedFile};
pub use workflow::{AnalysisForm, RiskAnalysisStore, WorkflowError, WorkflowStage, WorkflowState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "risksight";
