//! File payload encoding for the analyze endpoint.

use base64::{engine::general_purpose, Engine as _};

use super::file::{UploadedFile, MIME_DOC, MIME_DOCX, MIME_PDF, MIME_TXT};

/// Extensions the service accepts as a `file_type`.
const VALID_EXTENSIONS: [&str; 4] = ["pdf", "doc", "docx", "txt"];

/// Map a MIME type to the service's file type name.
pub fn file_type_from_mime(mime_type: &str) -> Option<&'static str> {
    match mime_type {
        MIME_PDF => Some("pdf"),
        MIME_DOC => Some("doc"),
        MIME_DOCX => Some("docx"),
        MIME_TXT => Some("txt"),
        _ => None,
    }
}

/// File type of an upload: from the MIME type, falling back to the extension.
pub fn file_type_for(file: &UploadedFile) -> Option<String> {
    if let Some(file_type) = file_type_from_mime(&file.mime_type) {
        return Some(file_type.to_string());
    }

    file.extension().filter(|ext| VALID_EXTENSIONS.contains(&ext.as_str()))
}

/// Read a file and encode its contents as standard base64.
///
/// The result is the bare payload, without any `data:<mime>;base64,` prefix.
pub async fn encode_base64(file: &UploadedFile) -> std::io::Result<String> {
    let bytes = file.read_bytes().await?;
    Ok(general_purpose::STANDARD.encode(bytes))
}
