//! Analysis form: the metadata a user fills in before analyzing.
//!
//! The form owns the guard that has to pass before the store is asked to
//! analyze anything: a file is selected, its text has been extracted, and
//! industry and company scale are set.

use super::store::{RiskAnalysisStore, WorkflowError, WorkflowState};
use crate::api::{AnalysisRequest, AnalysisResult};

/// Known document types.
pub const DOCUMENT_TYPES: [&str; 2] = ["meeting_transcript", "business_plan"];

/// Known industries.
pub const INDUSTRIES: [&str; 6] =
    ["technology", "finance", "healthcare", "retail", "manufacturing", "education"];

/// Known company scales.
pub const COMPANY_SCALES: [&str; 4] = ["startup", "small", "medium", "enterprise"];

/// Suggested analysis focus areas.
pub const ANALYSIS_FOCUS_OPTIONS: [&str; 10] = [
    "comprehensive risk assessment",
    "financial risk",
    "market & competitive risk",
    "operational risk",
    "technology & infrastructure risk",
    "regulatory & compliance risk",
    "strategic risk",
    "human capital risk",
    "reputational risk",
    "legal risk",
];

/// Why the form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please select a file first!")]
    NoFile,

    #[error("Please extract text from the file first!")]
    NotExtracted,

    #[error("Please complete all required fields!")]
    MissingFields(Vec<&'static str>),
}

/// User-supplied analysis metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisForm {
    pub industry: String,
    pub company_scale: String,
    pub document_type: String,
    /// Empty for no particular focus
    pub analysis_focus: String,
    /// Attach the original file to the request
    pub attach_file: bool,
}

impl Default for AnalysisForm {
    fn default() -> Self {
        Self {
            industry: String::new(),
            company_scale: String::new(),
            document_type: DOCUMENT_TYPES[0].to_string(),
            analysis_focus: String::new(),
            attach_file: true,
        }
    }
}

impl AnalysisForm {
    /// Required fields that are still blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.industry.trim().is_empty() {
            missing.push("industry");
        }
        if self.company_scale.trim().is_empty() {
            missing.push("company_scale");
        }
        if self.document_type.trim().is_empty() {
            missing.push("document_type");
        }
        missing
    }

    /// Check the form against the current workflow state.
    pub fn validate(&self, state: &WorkflowState) -> Result<(), FormError> {
        if state.file.is_none() {
            return Err(FormError::NoFile);
        }
        if state.extracted_text.is_none() {
            return Err(FormError::NotExtracted);
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing));
        }

        Ok(())
    }

    /// Build the analyze request for a document text.
    pub fn to_request(&self, document_content: impl Into<String>) -> AnalysisRequest {
        AnalysisRequest {
            document_content: document_content.into(),
            document_type: self.document_type.trim().to_string(),
            industry: self.industry.trim().to_string(),
            company_scale: self.company_scale.trim().to_string(),
            analysis_focus: self.analysis_focus.trim().to_string(),
            ..Default::default()
        }
    }

    /// Validate and run the analysis with the store's selected file and
    /// extracted text.
    ///
    /// Nothing reaches the store when validation fails.
    pub async fn submit(&self, store: &RiskAnalysisStore) -> Result<AnalysisResult, WorkflowError> {
        let state = store.snapshot();
        if let Err(e) = self.validate(&state) {
            tracing::warn!(error = %e, "Analysis form rejected");
            return Err(e.into());
        }

        let (Some(file), Some(extracted)) = (state.file, state.extracted_text) else {
            return Err(FormError::NotExtracted.into());
        };

        let request = self.to_request(extracted.extracted_text);
        let attachment = self.attach_file.then_some(&file);
        store.analyze(request, attachment).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::*;
    use crate::api::{fixtures, Severity};
    use crate::workflow::stage::WorkflowStage;
    use crate::workflow::store::testing::{extracted, txt_file, FakeService};

    fn filled() -> AnalysisForm {
        AnalysisForm {
            industry: "technology".to_string(),
            company_scale: "startup".to_string(),
            document_type: "business_plan".to_string(),
            analysis_focus: String::new(),
            attach_file: false,
        }
    }

    #[test]
    fn test_validate_requires_file() {
        let state = WorkflowState::default();
        assert_eq!(filled().validate(&state), Err(FormError::NoFile));
        assert_eq!(FormError::NoFile.to_string(), "Please select a file first!");
    }

    #[test]
    fn test_validate_requires_extraction() {
        let state = WorkflowState { file: Some(txt_file(10)), ..Default::default() };
        let err = filled().validate(&state).unwrap_err();
        assert_eq!(err.to_string(), "Please extract text from the file first!");
    }

    #[test]
    fn test_validate_requires_fields() {
        let state = WorkflowState {
            file: Some(txt_file(10)),
            extracted_text: Some(extracted("hello")),
            stage: WorkflowStage::Extracted,
            ..Default::default()
        };

        let form = AnalysisForm { industry: " ".to_string(), ..filled() };
        let err = form.validate(&state).unwrap_err();
        assert_eq!(err, FormError::MissingFields(vec!["industry"]));
        assert_eq!(err.to_string(), "Please complete all required fields!");

        assert!(filled().validate(&state).is_ok());
    }

    #[test]
    fn test_to_request() {
        let form = AnalysisForm { analysis_focus: " financial risk ".to_string(), ..filled() };
        let request = form.to_request("hello");
        assert_eq!(request.document_content, "hello");
        assert_eq!(request.industry, "technology");
        assert_eq!(request.analysis_focus, "financial risk");
        assert!(!request.has_attachment());
    }

    #[tokio::test]
    async fn test_submit_without_extraction_makes_no_call() {
        let service = Arc::new(FakeService::default());
        let store = RiskAnalysisStore::new(service.clone());
        store.select_file(txt_file(10)).unwrap();

        let err = filled().submit(&store).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.analyze_calls.load(Ordering::SeqCst), 0);
        assert_eq!(store.stage(), WorkflowStage::Idle);
    }

    #[tokio::test]
    async fn test_submit_sends_extracted_text_and_file() {
        let service = Arc::new(FakeService::default());
        service.push_extraction(Ok(extracted("hello")));
        service.push_analysis(Ok(fixtures::result(vec![fixtures::risk(
            "RISK_001",
            Severity::High,
            8.0,
            "market",
        )])));
        let store = RiskAnalysisStore::new(service.clone());
        let file = txt_file(2048);
        store.select_file(file.clone()).unwrap();
        store.extract_text(&file).await.unwrap();

        let form = AnalysisForm { attach_file: true, ..filled() };
        let result = form.submit(&store).await.unwrap();
        assert_eq!(result.identified_risk.len(), 1);

        let requests = service.requests.lock();
        assert_eq!(requests[0].0.document_content, "hello");
        assert_eq!(requests[0].1.as_deref(), Some("notes.txt"));
    }
}
