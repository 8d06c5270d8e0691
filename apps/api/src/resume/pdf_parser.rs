use bytes::Bytes;
use thiserror::Error;

use crate::analysis::text::clean_text;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Uploaded file is empty")]
    Empty,

    #[error("Only PDF files are supported")]
    NotPdf,

    #[error("Failed to extract text from PDF: {0}")]
    Extraction(String),

    #[error("No readable text found in PDF")]
    NoText,

    #[error("PDF could not be parsed")]
    ParserPanicked,
}

/// True when either the filename or the declared content type says PDF.
pub fn is_pdf(filename: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = filename
        .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or(false);
    let by_type = content_type
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false);
    by_name || by_type
}

/// Extracts and cleans the text of an in-memory PDF.
///
/// Parsing runs on the blocking pool. A panic inside the parser is reported
/// as `ParserPanicked`, which callers treat as a bad upload.
pub async fn extract_text(bytes: Bytes) -> Result<String, PdfError> {
    if bytes.is_empty() {
        return Err(PdfError::Empty);
    }

    let raw = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "PDF parser aborted");
            PdfError::ParserPanicked
        })?
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    let text = clean_text(&raw);
    if text.trim().is_empty() {
        return Err(PdfError::NoText);
    }
    Ok(text)
}
