use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::analysis::handlers::{optional_job_description, require_text};
use crate::errors::AppError;
use crate::resume::pdf_parser::{self, PdfError};
use crate::resume::{analyze_resume, ResumeAnalysis};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
    #[serde(default)]
    pub include_feedback: bool,
}

/// POST /api/v1/resumes/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<ResumeAnalysis>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    let job = optional_job_description(req.job_description.as_deref())?.map(str::to_owned);

    let analysis =
        analyze_resume(&state, req.resume_text, job, req.include_feedback, None).await?;
    Ok(Json(analysis))
}

struct UploadedFile {
    filename: String,
    data: Bytes,
}

/// POST /api/v1/resumes/upload
///
/// Multipart fields: `file` (PDF, required), `job_description` (optional),
/// `include_feedback` (optional, "true"/"false").
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let max_bytes = state.config.max_upload_bytes;
    let mut file: Option<UploadedFile> = None;
    let mut job_description: Option<String> = None;
    let mut include_feedback = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                if !pdf_parser::is_pdf(field.file_name(), field.content_type()) {
                    return Err(AppError::Validation(PdfError::NotPdf.to_string()));
                }
                let filename = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field.bytes().await?;
                if data.len() > max_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File exceeds the {max_bytes} byte upload limit"
                    )));
                }
                file = Some(UploadedFile { filename, data });
            }
            "job_description" => job_description = Some(field.text().await?),
            "include_feedback" => {
                include_feedback = field.text().await?.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let job = optional_job_description(job_description.as_deref())?.map(str::to_owned);

    info!(
        filename = %file.filename,
        bytes = file.data.len(),
        "Extracting resume text from PDF"
    );
    let text = pdf_parser::extract_text(file.data).await.map_err(pdf_error)?;

    let analysis =
        analyze_resume(&state, text, job, include_feedback, Some(file.filename)).await?;
    Ok(Json(analysis))
}

fn pdf_error(err: PdfError) -> AppError {
    match err {
        PdfError::Empty | PdfError::NotPdf | PdfError::ParserPanicked => {
            AppError::Validation(err.to_string())
        }
        PdfError::Extraction(_) | PdfError::NoText => {
            AppError::UnprocessableEntity(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_errors_map_to_client_errors() {
        assert!(matches!(pdf_error(PdfError::Empty), AppError::Validation(_)));
        assert!(matches!(
            pdf_error(PdfError::ParserPanicked),
            AppError::Validation(_)
        ));
        assert!(matches!(
            pdf_error(PdfError::NoText),
            AppError::UnprocessableEntity(_)
        ));
        assert!(matches!(
            pdf_error(PdfError::Extraction("bad xref".into())),
            AppError::UnprocessableEntity(_)
        ));
    }

    #[test]
    fn test_include_feedback_defaults_to_false() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"resume_text": "Rust"}"#).unwrap();
        assert!(!req.include_feedback);
        assert!(req.job_description.is_none());
    }
}
