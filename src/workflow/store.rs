//! Workflow state store.
//!
//! Single source of truth for one extract → analyze cycle. The store is an
//! explicit container: construct it with a [`RiskAnalysisService`], share it
//! by cloning, and drive it through its transition methods. Readers take
//! [`RiskAnalysisStore::snapshot`] or use the derived projections.
//!
//! The lock is never held across a service call, so the state can be read
//! while a call is outstanding.

use std::sync::Arc;

use parking_lot::RwLock;

use super::stage::WorkflowStage;
use crate::api::{
    AnalysisRequest, AnalysisResult, ApiError, ExtractedText, RiskAnalysisService, RiskItem,
};
use crate::document::{validate_file, FileValidationError, UploadedFile};

/// Errors surfaced by workflow transitions.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    InvalidFile(#[from] FileValidationError),

    #[error(transparent)]
    InvalidForm(#[from] super::form::FormError),

    #[error("Another operation is already in progress ({0})")]
    Busy(WorkflowStage),

    #[error(transparent)]
    Service(#[from] ApiError),
}

impl WorkflowError {
    /// Whether the error came from local validation, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidFile(_) | Self::InvalidForm(_) | Self::Busy(_))
    }
}

/// State of one workflow instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkflowState {
    /// Current stage
    pub stage: WorkflowStage,
    /// Currently selected file
    pub file: Option<UploadedFile>,
    /// Result of the last successful extraction
    pub extracted_text: Option<ExtractedText>,
    /// Result of the last successful analysis
    pub analysis_data: Option<AnalysisResult>,
    /// Message of the last failure
    pub error: Option<String>,
}

impl WorkflowState {
    pub fn is_extracting(&self) -> bool {
        self.stage == WorkflowStage::Extracting
    }

    /// Stage-based: true once an extraction has completed, even if a newly
    /// selected file has since invalidated `extracted_text`. Use
    /// [`Self::can_analyze`] to check that text is actually present.
    pub fn has_extracted_text(&self) -> bool {
        matches!(self.stage, WorkflowStage::Extracted | WorkflowStage::Analyzed)
    }

    pub fn is_analyzing(&self) -> bool {
        self.stage == WorkflowStage::Analyzing
    }

    pub fn has_analysis_result(&self) -> bool {
        self.stage == WorkflowStage::Analyzed
    }

    /// Extracted text is available and no call is outstanding.
    pub fn can_analyze(&self) -> bool {
        self.extracted_text.is_some() && !self.stage.is_busy()
    }

    /// Risks of the current analysis, empty when there is none.
    pub fn risks(&self) -> &[RiskItem] {
        match &self.analysis_data {
            Some(analysis) => &analysis.identified_risk,
            None => &[],
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: WorkflowState,
    /// Bumped by `clear_results` so completions of calls started before
    /// the reset are dropped.
    generation: u64,
}

/// Injectable, shareable workflow store.
#[derive(Clone)]
pub struct RiskAnalysisStore {
    inner: Arc<RwLock<Inner>>,
    service: Arc<dyn RiskAnalysisService>,
    max_upload_mb: Option<u32>,
}

impl std::fmt::Debug for RiskAnalysisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskAnalysisStore")
            .field("state", &self.inner.read().state)
            .field("service", &self.service.name())
            .finish()
    }
}

impl RiskAnalysisStore {
    /// Create an idle store over a service.
    pub fn new(service: Arc<dyn RiskAnalysisService>) -> Self {
        Self { inner: Arc::new(RwLock::new(Inner::default())), service, max_upload_mb: None }
    }

    /// Send a server-side size limit with extraction requests.
    pub fn with_max_upload_mb(mut self, max_upload_mb: Option<u32>) -> Self {
        self.max_upload_mb = max_upload_mb;
        self
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> WorkflowState {
        self.inner.read().state.clone()
    }

    pub fn stage(&self) -> WorkflowStage {
        self.inner.read().state.stage
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().state.error.clone()
    }

    pub fn is_extracting(&self) -> bool {
        self.inner.read().state.is_extracting()
    }

    /// Stage-based: true once an extraction has completed, even if a newly
    /// selected file has since invalidated `extracted_text`. Use
    /// [`Self::can_analyze`] to check that text is actually present.
    pub fn has_extracted_text(&self) -> bool {
        self.inner.read().state.has_extracted_text()
    }

    pub fn is_analyzing(&self) -> bool {
        self.inner.read().state.is_analyzing()
    }

    pub fn has_analysis_result(&self) -> bool {
        self.inner.read().state.has_analysis_result()
    }

    pub fn can_analyze(&self) -> bool {
        self.inner.read().state.can_analyze()
    }

    /// Risks of the current analysis.
    pub fn risks(&self) -> Vec<RiskItem> {
        self.inner.read().state.risks().to_vec()
    }

    /// Validate and select a file.
    ///
    /// A rejected file leaves the state untouched. An accepted file replaces
    /// the previous one and invalidates its extracted text; the stage is not
    /// changed.
    pub fn select_file(&self, file: UploadedFile) -> Result<(), WorkflowError> {
        if let Err(e) = validate_file(&file) {
            tracing::warn!(file = %file.name, mime = %file.mime_type, error = %e, "File rejected");
            return Err(e.into());
        }

        let mut inner = self.inner.write();
        if inner.state.stage.is_busy() {
            return Err(WorkflowError::Busy(inner.state.stage));
        }

        tracing::debug!(file = %file.name, size = file.size, "File selected");
        inner.state.file = Some(file);
        inner.state.extracted_text = None;
        Ok(())
    }

    /// Extract text from a file through the service.
    ///
    /// A response flagged `success: false` counts as a failure. On failure
    /// the store returns to `Idle` with the error recorded and both extracted
    /// text and analysis cleared.
    pub async fn extract_text(&self, file: &UploadedFile) -> Result<ExtractedText, WorkflowError> {
        let generation = self.begin(WorkflowStage::Extracting, |state| {
            state.analysis_data = None;
        })?;

        let result = self.service.extract_text(file, self.max_upload_mb).await;
        match result.and_then(ExtractedText::into_result) {
            Ok(extracted) => {
                self.complete(generation, WorkflowStage::Extracted, |state| {
                    state.extracted_text = Some(extracted.clone());
                });
                Ok(extracted)
            }
            Err(e) => {
                self.fail(generation, &e, |state| {
                    state.extracted_text = None;
                    state.analysis_data = None;
                });
                Err(e.into())
            }
        }
    }

    /// Analyze a document through the service.
    ///
    /// With `file` the original document is attached to the request. Starting
    /// an analysis discards the extracted text and any previous result; on
    /// failure the store returns to `Idle` with the error recorded.
    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        file: Option<&UploadedFile>,
    ) -> Result<AnalysisResult, WorkflowError> {
        let generation = self.begin(WorkflowStage::Analyzing, |state| {
            state.extracted_text = None;
            state.analysis_data = None;
        })?;

        match self.service.analyze(request, file).await {
            Ok(result) => {
                self.complete(generation, WorkflowStage::Analyzed, |state| {
                    state.analysis_data = Some(result.clone());
                });
                Ok(result)
            }
            Err(e) => {
                self.fail(generation, &e, |state| {
                    state.analysis_data = None;
                });
                Err(e.into())
            }
        }
    }

    /// Reset to `Idle`, dropping the file and every artifact.
    pub fn clear_results(&self) {
        let mut inner = self.inner.write();
        if inner.state.stage.is_busy() {
            tracing::debug!(stage = %inner.state.stage, "Clearing while a call is outstanding");
        }
        inner.state = WorkflowState::default();
        inner.generation += 1;
    }

    /// Clear the recorded error only.
    pub fn reset_error(&self) {
        self.inner.write().state.error = None;
    }

    /// Enter a busy stage, refusing if a call is already outstanding.
    fn begin(
        &self,
        stage: WorkflowStage,
        reset: impl FnOnce(&mut WorkflowState),
    ) -> Result<u64, WorkflowError> {
        let mut inner = self.inner.write();
        let current = inner.state.stage;
        if current.is_busy() {
            tracing::warn!(current = %current, requested = %stage, "Rejected while busy");
            return Err(WorkflowError::Busy(current));
        }

        tracing::debug!(from = %current, to = %stage, "Workflow transition");
        inner.state.stage = stage;
        inner.state.error = None;
        reset(&mut inner.state);
        Ok(inner.generation)
    }

    fn complete(
        &self,
        generation: u64,
        stage: WorkflowStage,
        apply: impl FnOnce(&mut WorkflowState),
    ) {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            tracing::debug!(to = %stage, "Discarding result of a call started before reset");
            return;
        }

        tracing::debug!(from = %inner.state.stage, to = %stage, "Workflow transition");
        inner.state.stage = stage;
        inner.state.error = None;
        apply(&mut inner.state);
    }

    fn fail(&self, generation: u64, error: &ApiError, apply: impl FnOnce(&mut WorkflowState)) {
        let mut inner = self.inner.write();
        if inner.generation != generation {
            tracing::debug!(error = %error, "Discarding failure of a call started before reset");
            return;
        }

        tracing::warn!(from = %inner.state.stage, error = %error, "Workflow step failed");
        inner.state.stage = WorkflowStage::Idle;
        inner.state.error = Some(error.to_string());
        apply(&mut inner.state);
    }
}
