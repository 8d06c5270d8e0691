use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::ats_scorer::{interpret_ats_score, AtsScoreBreakdown};
use crate::analysis::matcher::{interpret_match, MatchResult, RankedResume};
use crate::analysis::skill_extractor::SkillExtractionResult;
use crate::analysis::run_blocking;
use crate::errors::AppError;
use crate::feedback::{FeedbackInput, FeedbackReport};
use crate::state::AppState;

pub const MAX_JOB_DESCRIPTION_CHARS: usize = 50_000;
pub const MAX_RANKED_RESUMES: usize = 50;

#[derive(Deserialize)]
pub struct SkillsRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct AtsScoreRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct AtsScoreResponse {
    pub breakdown: AtsScoreBreakdown,
    pub interpretation: &'static str,
}

#[derive(Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Serialize)]
pub struct MatchResponse {
    pub result: MatchResult,
    pub interpretation: &'static str,
}

#[derive(Deserialize)]
pub struct RankRequest {
    pub resumes: Vec<String>,
    pub job_description: String,
}

#[derive(Serialize)]
pub struct RankResponse {
    pub rankings: Vec<RankedResume>,
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    #[serde(flatten)]
    pub report: FeedbackReport,
    pub feedback: String,
}

/// POST /api/v1/analysis/skills
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    Json(req): Json<SkillsRequest>,
) -> Result<Json<SkillExtractionResult>, AppError> {
    require_text("text", &req.text)?;
    let skills = run_blocking(&state.analyzer, move |a| a.extract_skills(&req.text)).await?;
    Ok(Json(skills))
}

/// POST /api/v1/analysis/ats-score
pub async fn handle_ats_score(
    State(state): State<AppState>,
    Json(req): Json<AtsScoreRequest>,
) -> Result<Json<AtsScoreResponse>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    let job = optional_job_description(req.job_description.as_deref())?.map(str::to_owned);
    let resume = req.resume_text;

    let (_, breakdown) =
        run_blocking(&state.analyzer, move |a| a.score(&resume, job.as_deref())).await?;
    Ok(Json(AtsScoreResponse {
        interpretation: interpret_ats_score(breakdown.total),
        breakdown,
    }))
}

/// POST /api/v1/analysis/match
pub async fn handle_match(
    State(state): State<AppState>,
    Json(req): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    require_text("resume_text", &req.resume_text)?;
    require_job_description(&req.job_description)?;

    let result = run_blocking(&state.analyzer, move |a| {
        a.match_job(&req.resume_text, &req.job_description)
    })
    .await?;
    Ok(Json(MatchResponse {
        interpretation: interpret_match(result.match_percentage),
        result,
    }))
}

/// POST /api/v1/analysis/rank
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    if req.resumes.is_empty() {
        return Err(AppError::Validation(
            "resumes must contain at least one resume".into(),
        ));
    }
    if req.resumes.len() > MAX_RANKED_RESUMES {
        return Err(AppError::Validation(format!(
            "resumes cannot contain more than {MAX_RANKED_RESUMES} entries"
        )));
    }
    require_job_description(&req.job_description)?;

    let rankings = run_blocking(&state.analyzer, move |a| {
        let resumes: Vec<&str> = req.resumes.iter().map(String::as_str).collect();
        a.rank_resumes(&resumes, &req.job_description)
    })
    .await?;
    Ok(Json(RankResponse { rankings }))
}

/// POST /api/v1/analysis/feedback
pub async fn handle_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let resume = require_text("resume_text", &req.resume_text)?;
    let job = optional_job_description(req.job_description.as_deref())?;

    let assessment = {
        let resume = resume.to_owned();
        let job = job.map(str::to_owned);
        run_blocking(&state.analyzer, move |a| a.assess(&resume, job.as_deref())).await?
    };

    let report = state
        .feedback
        .report(&FeedbackInput {
            resume_text: resume,
            skills: &assessment.skills,
            breakdown: &assessment.breakdown,
            match_result: assessment.match_result.as_ref(),
            job_description: job,
        })
        .await;

    Ok(Json(FeedbackResponse {
        feedback: report.render(),
        report,
    }))
}

/// Rejects blank text; returns it unchanged otherwise.
pub(crate) fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

pub(crate) fn require_job_description(value: &str) -> Result<&str, AppError> {
    let value = require_text("job_description", value)?;
    if value.chars().count() > MAX_JOB_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "job_description cannot exceed {MAX_JOB_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(value)
}

/// An absent or blank job description means "score without a job".
pub(crate) fn optional_job_description(value: Option<&str>) -> Result<Option<&str>, AppError> {
    match value {
        Some(jd) if !jd.trim().is_empty() => require_job_description(jd).map(Some),
        _ => Ok(None),
    }
}
