//! Document handling: the uploaded file, local validation and payload encoding.

mod encoding;
mod file;
mod validation;

pub use encoding::{encode_base64, file_type_for, file_type_from_mime};
pub use file::{
    format_file_size, mime_from_name, FileSource, UploadedFile, MIME_DOC, MIME_DOCX, MIME_PDF,
    MIME_TXT,
};
pub use validation::{
    extension_for_mime, is_allowed_mime, validate_file, FileValidationError, ALLOWED_TYPES,
    MAX_FILE_SIZE_BYTES, MAX_FILE_SIZE_MB,
};
