//! Contract document reading
//!
//! PDFs are decoded with `pdf-extract`; plain text and markdown files are read
//! as UTF-8. PDF text is pulled page by page; every non-empty page contributes
//! its text followed by a newline.

use crate::error::SourceReadError;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use tracing::{debug, error, warn};

/// Input formats the reader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Portable Document Format
    Pdf,
    /// UTF-8 text, including markdown
    Text,
}

impl DocumentKind {
    /// Infer the kind from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, SourceReadError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentKind::Pdf),
            "txt" | "text" | "md" | "markdown" => Ok(DocumentKind::Text),
            "" => Err(SourceReadError::Unsupported(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(SourceReadError::Unsupported(format!(".{}", other))),
        }
    }
}

/// Read a contract document from disk
pub fn read_document(path: &Path) -> Result<String, SourceReadError> {
    let kind = DocumentKind::from_path(path)?;

    if !path.exists() {
        error!("Contract file not found at '{}'", path.display());
        return Err(SourceReadError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| SourceReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());

    match kind {
        DocumentKind::Pdf => read_pdf_bytes(&bytes),
        DocumentKind::Text => String::from_utf8(bytes)
            .map_err(|_| SourceReadError::NotUtf8(path.to_path_buf())),
    }
}

/// Extract the text of an in-memory PDF
///
/// An empty string means the PDF decoded but carries no extractable text
/// (a scanned image, for example).
pub fn read_pdf_bytes(bytes: &[u8]) -> Result<String, SourceReadError> {
    // pdf-extract panics on some malformed inputs instead of returning an error
    let pages = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    }))
    .map_err(|_| {
        error!("PDF decoder aborted on malformed input");
        SourceReadError::InvalidPdf("decoder aborted on malformed input".to_string())
    })?
    .map_err(|e| {
        error!("Error reading PDF: {}", e);
        SourceReadError::InvalidPdf(e.to_string())
    })?;

    debug!("PDF yielded {} page(s)", pages.len());
    let text = join_pages(pages.iter().map(String::as_str));
    if text.is_empty() {
        warn!("PDF contains no extractable text");
    }
    Ok(text)
}

fn join_pages<'a>(pages: impl Iterator<Item = &'a str>) -> String {
    let mut text = String::new();
    for page in pages.filter(|p| !p.trim().is_empty()) {
        text.push_str(page);
        text.push('\n');
    }
    text
}
