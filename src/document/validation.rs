//! Local file validation.
//!
//! Applied before a file is accepted into the workflow, whichever way it was
//! picked. Never touches the network.

use super::file::{UploadedFile, MIME_DOC, MIME_DOCX, MIME_PDF, MIME_TXT};

/// Maximum accepted upload size in megabytes.
pub const MAX_FILE_SIZE_MB: u64 = 10;

/// Maximum accepted upload size in bytes.
pub const MAX_FILE_SIZE_BYTES: u64 = MAX_FILE_SIZE_MB * 1024 * 1024;

/// Accepted MIME types and the extension shown for each.
pub const ALLOWED_TYPES: [(&str, &str); 4] =
    [(MIME_TXT, ".txt"), (MIME_PDF, ".pdf"), (MIME_DOCX, ".docx"), (MIME_DOC, ".doc")];

/// Why a file was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileValidationError {
    #[error("File size must be less than {max_mb}MB")]
    TooLarge { size: u64, max_mb: u64 },

    #[error("Only PDF, DOCX, DOC, and TXT files are allowed")]
    UnsupportedType(String),
}

/// Whether a MIME type is on the allow-list.
pub fn is_allowed_mime(mime_type: &str) -> bool {
    ALLOWED_TYPES.iter().any(|(mime, _)| *mime == mime_type)
}

/// Display extension for an allowed MIME type.
pub fn extension_for_mime(mime_type: &str) -> Option<&'static str> {
    ALLOWED_TYPES.iter().find(|(mime, _)| *mime == mime_type).map(|(_, ext)| *ext)
}

/// Validate a file against the size limit and the MIME allow-list.
///
/// Size is checked first.
pub fn validate_file(file: &UploadedFile) -> Result<(), FileValidationError> {
    if file.size > MAX_FILE_SIZE_BYTES {
        return Err(FileValidationError::TooLarge { size: file.size, max_mb: MAX_FILE_SIZE_MB });
    }

    if !is_allowed_mime(&file.mime_type) {
        return Err(FileValidationError::UnsupportedType(file.mime_type.clone()));
    }

    Ok(())
}
