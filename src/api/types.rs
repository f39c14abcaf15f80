//! Wire types exchanged with the risk-analysis service.
//!
//! Field names follow the service's JSON exactly so that an exported result
//! can be read back without any mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::client::{ApiError, ApiResult};

/// Response of the text-extraction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Whether the service managed to extract text
    pub success: bool,
    /// Name of the uploaded file
    pub filename: String,
    /// Detected file type (pdf, docx, doc, txt)
    pub file_type: String,
    /// File size in megabytes as seen by the service
    pub file_size_mb: f64,
    /// Server-side processing time
    pub processing_time_ms: f64,
    /// The extracted plain text
    pub extracted_text: String,
    /// Number of characters in the text
    pub text_length: u64,
    /// Number of words in the text
    pub word_count: u64,
    /// Number of lines in the text
    pub line_count: u64,
    /// Error reported by the service, if any
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ExtractedText {
    /// Character count of the extracted text as held locally.
    pub fn char_count(&self) -> usize {
        self.extracted_text.chars().count()
    }

    /// Turn an in-band failure (`success: false`) into an error.
    ///
    /// The upload endpoint answers 200 even when it could not read the
    /// document, with the reason in `error_message`.
    pub fn into_result(self) -> ApiResult<Self> {
        if self.success {
            return Ok(self);
        }

        let message = self
            .error_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("could not extract text from {}", self.filename));
        Err(ApiError::Extraction(message))
    }
}

/// Request body of the analyze endpoint.
///
/// The `file_*` fields are only populated when the original document is
/// attached; they are omitted from the JSON otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Extracted document text
    pub document_content: String,
    /// Document type (meeting_transcript, business_plan)
    pub document_type: String,
    /// Industry context
    pub industry: String,
    /// Company scale (startup, small, medium, enterprise)
    pub company_scale: String,
    /// Optional focus area, empty when unset
    #[serde(default)]
    pub analysis_focus: String,
    /// Base64 file payload without data-URL prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<String>,
    /// File type inferred from the MIME type or extension
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    /// Original file name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl AnalysisRequest {
    /// Whether a file payload is attached.
    pub fn has_attachment(&self) -> bool {
        self.file_data.is_some()
    }

    /// Drop any attached file payload.
    pub fn without_attachment(mut self) -> Self {
        self.file_data = None;
        self.file_type = None;
        self.filename = None;
        self
    }
}

/// Risk severity, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most urgent first.
    pub const ALL: [Self; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Capitalized label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Hex color used by the charts.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Critical => "#ef4444",
            Self::High => "#f97316",
            Self::Medium => "#eab308",
            Self::Low => "#22c55e",
        }
    }

    /// Critical and high risks are treated as high priority.
    pub fn is_high_priority(&self) -> bool {
        matches!(self, Self::Critical | Self::High)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One identified risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskItem {
    /// Risk identifier (e.g., "RISK_001")
    pub risk_id: String,
    pub title: String,
    pub description: String,
    /// Category (financial, market, operational, ...)
    pub category: String,
    pub severity: Severity,
    /// Probability bucket (low, medium, high)
    pub probability: String,
    /// Numeric score, roughly 0-10
    pub risk_score: f64,
    #[serde(default)]
    pub impact_areas: Vec<String>,
    #[serde(default)]
    pub mitigation_recommendations: Vec<String>,
    /// Excerpt from the document supporting the risk
    #[serde(default)]
    pub context_evidence: String,
}

/// Metadata about the analyzed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub document_type: String,
    #[serde(default)]
    pub industry: Option<String>,
    pub company_scale: String,
    /// Timestamp as reported by the service
    pub analysis_timestamp: String,
    /// Number of characters analyzed
    pub document_length: u64,
}

/// Count of risks per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    #[serde(default)]
    pub critical: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub low: u32,
}

impl RiskDistribution {
    /// Count for a single severity.
    pub fn count(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    /// Sum over all severities.
    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low
    }

    /// Critical plus high.
    pub fn high_priority(&self) -> u32 {
        self.critical + self.high
    }
}

/// Aggregate view over all identified risks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_risks: u32,
    pub risk_distribution: RiskDistribution,
    #[serde(default)]
    pub top_categories: Vec<String>,
    pub overall_risk_score: f64,
    #[serde(default)]
    pub key_concerns: Vec<String>,
}

/// Complete response of the analyze endpoint.
///
/// Immutable once received; the next analysis replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub document_analysis: DocumentAnalysis,
    /// Risks in the order the service returned them
    pub identified_risk: Vec<RiskItem>,
    pub risk_summary: RiskSummary,
    /// Processing time in seconds
    pub processing_time: f64,
}

impl AnalysisResult {
    /// Identified risks.
    pub fn risks(&self) -> &[RiskItem] {
        &self.identified_risk
    }

    /// Look up a risk by id.
    pub fn risk(&self, risk_id: &str) -> Option<&RiskItem> {
        self.identified_risk.iter().find(|r| r.risk_id == risk_id)
    }

    /// Human readable one-liner used after an analysis completes.
    pub fn completion_message(&self) -> String {
        let count = self.identified_risk.len();
        if count == 1 {
            "Analysis complete! 1 risk has been identified.".to_string()
        } else {
            format!("Analysis complete! {} risks have been identified.", count)
        }
    }
}
