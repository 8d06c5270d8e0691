// Matching and scoring pipeline.
// Everything here is synchronous and deterministic; the vocabulary and compiled
// patterns are built once at startup and shared read-only. Async callers go
// through `run_blocking`.

pub mod ats_scorer;
pub mod handlers;
pub mod matcher;
pub mod skill_extractor;
pub mod stop_words;
pub mod text;
pub mod tfidf;
pub mod vocabulary;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::analysis::ats_scorer::{AtsScoreBreakdown, AtsScorer, ScoringThresholds};
use crate::analysis::matcher::{JobMatcher, MatchResult, RankedResume};
use crate::analysis::skill_extractor::{SkillExtractionResult, SkillExtractor};
use crate::analysis::tfidf::{TfidfVectorizer, DEFAULT_MAX_FEATURES};
use crate::analysis::vocabulary::SkillVocabulary;
use crate::errors::AppError;

/// Skills, ATS breakdown and, when a job is given, the job match for one resume.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub skills: SkillExtractionResult,
    pub breakdown: AtsScoreBreakdown,
    pub match_result: Option<MatchResult>,
}

/// The full pipeline, wired once at startup and shared via `Arc`.
pub struct Analyzer {
    extractor: SkillExtractor,
    scorer: AtsScorer,
    matcher: JobMatcher,
}

impl Analyzer {
    pub fn new(vocabulary: Arc<SkillVocabulary>, thresholds: ScoringThresholds) -> Result<Self> {
        let extractor = SkillExtractor::new(vocabulary);
        let scorer = AtsScorer::new(thresholds).context("Failed to compile ATS patterns")?;
        let vectorizer = TfidfVectorizer::new(DEFAULT_MAX_FEATURES)
            .context("Failed to compile TF-IDF tokenizer")?;
        let matcher = JobMatcher::new(extractor.clone(), vectorizer);

        Ok(Self {
            extractor,
            scorer,
            matcher,
        })
    }

    pub fn extract_skills(&self, text: &str) -> SkillExtractionResult {
        self.extractor.extract(text)
    }

    /// Extracts skills and scores the resume, using the job description's
    /// skills for the job-aware sub-scores when one is given.
    pub fn score(
        &self,
        resume_text: &str,
        job_description: Option<&str>,
    ) -> (SkillExtractionResult, AtsScoreBreakdown) {
        let skills = self.extractor.extract(resume_text);
        let job_skills = job_description.map(|jd| self.extractor.extract(jd).all);
        let breakdown = self
            .scorer
            .score(resume_text, &skills, job_skills.as_ref());
        (skills, breakdown)
    }

    pub fn assess(&self, resume_text: &str, job_description: Option<&str>) -> Assessment {
        let (skills, breakdown) = self.score(resume_text, job_description);
        let match_result = job_description.map(|jd| self.match_job(resume_text, jd));
        Assessment {
            skills,
            breakdown,
            match_result,
        }
    }

    pub fn match_job(&self, resume_text: &str, job_description: &str) -> MatchResult {
        self.matcher.match_job(resume_text, job_description)
    }

    pub fn rank_resumes(&self, resumes: &[&str], job_description: &str) -> Vec<RankedResume> {
        self.matcher.rank_resumes(resumes, job_description)
    }
}

/// Runs `work` against the shared analyzer on the blocking pool.
pub async fn run_blocking<T, F>(analyzer: &Arc<Analyzer>, work: F) -> Result<T, AppError>
where
    F: FnOnce(&Analyzer) -> T + Send + 'static,
    T: Send + 'static,
{
    // CPU-bound pass; keep it off the async executor.
    let analyzer = Arc::clone(analyzer);
    tokio::task::spawn_blocking(move || work(&analyzer))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}")))
}
