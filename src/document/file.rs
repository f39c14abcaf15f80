//! Uploaded file handle.

use std::path::{Path, PathBuf};

/// MIME type for plain text.
pub const MIME_TXT: &str = "text/plain";
/// MIME type for PDF.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type for legacy Word documents.
pub const MIME_DOC: &str = "application/msword";
/// MIME type for Office Open XML Word documents.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Where the file contents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    /// On disk, read lazily when the contents are needed
    Path(PathBuf),
    /// Already in memory
    Memory(Vec<u8>),
}

/// A user-selected document.
///
/// Only the metadata is inspected by validation; the contents are read when
/// the file is uploaded or encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name without directories
    pub name: String,
    /// MIME type (empty when unknown)
    pub mime_type: String,
    /// Size in bytes
    pub size: u64,
    pub(crate) source: FileSource,
}

impl UploadedFile {
    /// Create a file from in-memory contents.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size: bytes.len() as u64,
            source: FileSource::Memory(bytes),
        }
    }

    /// Create a file from a path on disk.
    ///
    /// Reads the size from the file metadata and infers the MIME type from
    /// the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_from_name(&name).unwrap_or_default().to_string();

        Ok(Self {
            name,
            mime_type,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Override the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// Where the contents come from.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Lowercased extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() && ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }

    /// Read the full contents.
    pub async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Guess a MIME type from a file name's extension.
///
/// Only the document types the service understands plus a handful of common
/// types are recognized.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    let mime = match ext.as_str() {
        "txt" | "text" => MIME_TXT,
        "pdf" => MIME_PDF,
        "doc" => MIME_DOC,
        "docx" => MIME_DOCX,
        "md" => "text/markdown",
        "json" => "application/json",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "zip" => "application/zip",
        "exe" | "dll" => "application/x-msdownload",
        _ => "application/octet-stream",
    };
    Some(mime)
}

/// Human readable size ("2 KB", "1.5 MB").
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
