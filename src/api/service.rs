//! Risk-analysis service operations.
//!
//! Two calls: extract text from an uploaded document, and analyze document
//! text (optionally with the original file attached). Each invocation is a
//! fresh request; nothing is cached or retried.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::client::{ApiClient, ApiError, ApiResult};
use super::types::{AnalysisRequest, AnalysisResult, ExtractedText};
use crate::document::{encode_base64, file_type_for, UploadedFile};

/// Analyze endpoint path.
pub const ANALYZE_ENDPOINT: &str = "/analyze";

/// Text extraction endpoint path.
pub const UPLOAD_ENDPOINT: &str = "/file-processor/process-upload";

/// Operations the workflow needs from the analysis service.
#[async_trait]
pub trait RiskAnalysisService: Send + Sync {
    /// Upload a file and get its plain text back.
    async fn extract_text(
        &self,
        file: &UploadedFile,
        max_size_mb: Option<u32>,
    ) -> ApiResult<ExtractedText>;

    /// Analyze a document.
    ///
    /// When `file` is given it is encoded and attached to the request, which
    /// fails before anything is sent if the file cannot be read.
    async fn analyze(
        &self,
        request: AnalysisRequest,
        file: Option<&UploadedFile>,
    ) -> ApiResult<AnalysisResult>;

    /// Get the service name.
    fn name(&self) -> &str;
}

/// Attach a file to an analyze request.
///
/// Fills `file_data`, `file_type` and `filename`, replacing any previous
/// attachment.
pub async fn attach_file(
    request: AnalysisRequest,
    file: &UploadedFile,
) -> ApiResult<AnalysisRequest> {
    let file_data = encode_base64(file).await.map_err(|e| {
        tracing::warn!(file = %file.name, error = %e, "Failed to encode file");
        ApiError::Encoding(e.to_string())
    })?;

    Ok(AnalysisRequest {
        file_data: Some(file_data),
        file_type: file_type_for(file),
        filename: Some(file.name.clone()),
        ..request.without_attachment()
    })
}

/// Service implementation backed by the HTTP API.
#[derive(Debug, Clone)]
pub struct HttpRiskAnalysisService {
    client: ApiClient,
}

impl HttpRiskAnalysisService {
    /// Create a service over an API client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Underlying API client.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

#[async_trait]
impl RiskAnalysisService for HttpRiskAnalysisService {
    async fn extract_text(
        &self,
        file: &UploadedFile,
        max_size_mb: Option<u32>,
    ) -> ApiResult<ExtractedText> {
        let bytes = file.read_bytes().await.map_err(|e| ApiError::Encoding(e.to_string()))?;

        let mut part = Part::bytes(bytes).file_name(file.name.clone());
        if !file.mime_type.is_empty() {
            part = part.mime_str(&file.mime_type)?;
        }

        let mut form = Form::new().part("file", part);
        if let Some(max) = max_size_mb {
            form = form.text("max_size_mb", max.to_string());
        }

        tracing::info!(file = %file.name, size = file.size, "Extracting text");
        let extracted: ExtractedText = self.client.post_multipart(UPLOAD_ENDPOINT, form).await?;
        let extracted = extracted.into_result().map_err(|e| {
            tracing::warn!(file = %file.name, error = %e, "Service could not extract text");
            e
        })?;
        tracing::info!(
            file = %file.name,
            chars = extracted.text_length,
            words = extracted.word_count,
            "Text extracted"
        );

        Ok(extracted)
    }

    async fn analyze(
        &self,
        request: AnalysisRequest,
        file: Option<&UploadedFile>,
    ) -> ApiResult<AnalysisResult> {
        let request = match file {
            Some(file) => attach_file(request, file).await?,
            None => request,
        };

        tracing::info!(
            industry = %request.industry,
            company_scale = %request.company_scale,
            document_type = %request.document_type,
            attached = request.has_attachment(),
            "Analyzing document"
        );
        let result: AnalysisResult = self.client.post_json(ANALYZE_ENDPOINT, &request).await?;
        tracing::info!(risks = result.identified_risk.len(), "Analysis finished");

        Ok(result)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FileSource, MIME_DOCX, MIME_TXT};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            document_content: "hello".to_string(),
            document_type: "business_plan".to_string(),
            industry: "technology".to_string(),
            company_scale: "startup".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_attach_file_fills_fields() {
        let file = UploadedFile::from_bytes("notes.txt", MIME_TXT, b"hello".to_vec());
        let request = attach_file(request(), &file).await.unwrap();

        assert_eq!(request.file_data.as_deref(), Some("aGVsbG8="));
        assert_eq!(request.file_type.as_deref(), Some("txt"));
        assert_eq!(request.filename.as_deref(), Some("notes.txt"));
        assert_eq!(request.document_content, "hello");
    }

    #[tokio::test]
    async fn test_attach_file_replaces_previous_attachment() {
        let first = UploadedFile::from_bytes("a.txt", MIME_TXT, b"a".to_vec());
        let second = UploadedFile::from_bytes("plan.docx", MIME_DOCX, b"b".to_vec());

        let request = attach_file(request(), &first).await.unwrap();
        let request = attach_file(request, &second).await.unwrap();

        assert_eq!(request.filename.as_deref(), Some("plan.docx"));
        assert_eq!(request.file_type.as_deref(), Some("docx"));
    }

    #[tokio::test]
    async fn test_attach_unreadable_file_fails() {
        let file = UploadedFile {
            name: "gone.txt".to_string(),
            mime_type: MIME_TXT.to_string(),
            size: 3,
            source: FileSource::Path("/nonexistent/risksight/gone.txt".into()),
        };

        let err = attach_file(request(), &file).await.unwrap_err();
        assert!(matches!(err, ApiError::Encoding(_)));
    }
}
