//! Analysis service integration.
//!
//! The service does the heavy lifting (text extraction, risk scoring); this
//! module only speaks its HTTP API.
//!
//! ## Endpoints
//!
//! - `POST /file-processor/process-upload` - multipart upload, returns extracted text
//! - `POST /analyze` - JSON request, returns identified risks

mod client;
mod service;
mod types;

pub use client::{ApiClient, ApiError, ApiResult};
pub use service::{
    attach_file, HttpRiskAnalysisService, RiskAnalysisService, ANALYZE_ENDPOINT, UPLOAD_ENDPOINT,
};
pub use types::{
    AnalysisRequest, AnalysisResult, DocumentAnalysis, ExtractedText, RiskDistribution, RiskItem,
    RiskSummary, Severity,
};

#[cfg(test)]
pub(crate) use types::fixtures;
