// Resume intake: raw text or PDF upload in, complete analysis out.

pub mod handlers;
pub mod pdf_parser;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::ats_scorer::{interpret_ats_score, AtsScoreBreakdown};
use crate::analysis::matcher::{interpret_match, MatchResult};
use crate::analysis::skill_extractor::SkillExtractionResult;
use crate::analysis::text::word_count;
use crate::analysis::{run_blocking, Assessment};
use crate::errors::AppError;
use crate::feedback::{FeedbackInput, FeedbackReport};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobMatch {
    #[serde(flatten)]
    pub result: MatchResult,
    pub interpretation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FeedbackSection {
    #[serde(flatten)]
    pub report: FeedbackReport,
    pub feedback: String,
}

/// Full pipeline output for one resume.
#[derive(Debug, Serialize)]
pub struct ResumeAnalysis {
    pub analysis_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    pub word_count: usize,
    pub skills: SkillExtractionResult,
    pub ats: AtsScoreBreakdown,
    pub interpretation: &'static str,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub job_match: Option<JobMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackSection>,
    pub analyzed_at: DateTime<Utc>,
}

/// Runs extraction, scoring, optional matching and optional feedback.
/// `resume_text` must already be validated as non-blank.
pub async fn analyze_resume(
    state: &AppState,
    resume_text: String,
    job_description: Option<String>,
    include_feedback: bool,
    filename: Option<String>,
) -> Result<ResumeAnalysis, AppError> {
    let analysis_id = Uuid::new_v4();
    let (resume_text, job_description, assessment) =
        run_blocking(&state.analyzer, move |a| {
            let assessment = a.assess(&resume_text, job_description.as_deref());
            (resume_text, job_description, assessment)
        })
        .await?;
    let Assessment {
        skills,
        breakdown: ats,
        match_result,
    } = assessment;
    let resume_text = resume_text.as_str();
    let job_description = job_description.as_deref();

    let feedback = if include_feedback {
        let report = state
            .feedback
            .report(&FeedbackInput {
                resume_text,
                skills: &skills,
                breakdown: &ats,
                match_result: match_result.as_ref(),
                job_description,
            })
            .await;
        Some(FeedbackSection {
            feedback: report.render(),
            report,
        })
    } else {
        None
    };

    tracing::info!(
        analysis_id = %analysis_id,
        skills = skills.len(),
        ats_total = ats.total,
        match_percentage = ?match_result.as_ref().map(|m| m.match_percentage),
        feedback_source = ?feedback.as_ref().map(|f| f.report.source.as_str()),
        "Resume analyzed"
    );

    Ok(ResumeAnalysis {
        analysis_id,
        filename,
        word_count: word_count(resume_text),
        interpretation: interpret_ats_score(ats.total),
        skills,
        ats,
        job_match: match_result.map(|result| JobMatch {
            interpretation: interpret_match(result.match_percentage),
            result,
        }),
        feedback,
        analyzed_at: Utc::now(),
    })
}
