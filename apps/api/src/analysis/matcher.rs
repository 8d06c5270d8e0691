//! Job Matcher: resume vs job description.
//!
//! match_percentage = 40% skill overlap + 30% technical overlap + 30% cosine
//! similarity of the TF-IDF vectors, on a 0–100 scale.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::skill_extractor::SkillExtractor;
use crate::analysis::text::{truncate_chars, MAX_TEXT_CHARS};
use crate::analysis::tfidf::TfidfVectorizer;

const SKILL_OVERLAP_WEIGHT: f64 = 0.40;
const TECHNICAL_OVERLAP_WEIGHT: f64 = 0.30;
const COSINE_WEIGHT: f64 = 0.30;
/// Technical overlap credited when the job names skills but none technical.
const NEUTRAL_TECHNICAL_RATIO: f64 = 0.5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_percentage: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub matched_technical_skills: BTreeSet<String>,
    pub missing_technical_skills: BTreeSet<String>,
    /// 0.0 – 1.0
    pub cosine_similarity: f64,
}

/// One entry of a ranking produced by `JobMatcher::rank_resumes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResume {
    /// Position of the resume in the input slice.
    pub index: usize,
    pub match_percentage: f64,
}

pub struct JobMatcher {
    extractor: SkillExtractor,
    vectorizer: TfidfVectorizer,
}

impl JobMatcher {
    pub fn new(extractor: SkillExtractor, vectorizer: TfidfVectorizer) -> Self {
        Self {
            extractor,
            vectorizer,
        }
    }

    pub fn match_job(&self, resume_text: &str, job_description: &str) -> MatchResult {
        let resume = self.extractor.extract(resume_text);
        let job = self.extractor.extract(job_description);

        let matched_skills: BTreeSet<String> = job.all.intersection(&resume.all).cloned().collect();
        let missing_skills: BTreeSet<String> = job.all.difference(&resume.all).cloned().collect();
        let matched_technical_skills: BTreeSet<String> = job
            .technical
            .intersection(&resume.technical)
            .cloned()
            .collect();
        let missing_technical_skills: BTreeSet<String> = job
            .technical
            .difference(&resume.technical)
            .cloned()
            .collect();

        let skill_ratio = matched_skills.len() as f64 / job.all.len().max(1) as f64;
        let technical_ratio = if !job.technical.is_empty() {
            matched_technical_skills.len() as f64 / job.technical.len() as f64
        } else if job.all.is_empty() {
            0.0
        } else {
            NEUTRAL_TECHNICAL_RATIO
        };

        let cosine_similarity = self.vectorizer.similarity(
            truncate_chars(resume_text, MAX_TEXT_CHARS),
            truncate_chars(job_description, MAX_TEXT_CHARS),
        );

        let match_percentage = ((SKILL_OVERLAP_WEIGHT * skill_ratio
            + TECHNICAL_OVERLAP_WEIGHT * technical_ratio
            + COSINE_WEIGHT * cosine_similarity)
            * 100.0)
            .clamp(0.0, 100.0);

        tracing::debug!(
            job_skills = job.all.len(),
            matched = matched_skills.len(),
            cosine_similarity,
            match_percentage,
            "job match computed"
        );

        MatchResult {
            match_percentage: round_to(match_percentage, 2),
            matched_skills,
            missing_skills,
            matched_technical_skills,
            missing_technical_skills,
            cosine_similarity: round_to(cosine_similarity, 4),
        }
    }

    /// Scores every resume against one job, best match first.
    /// Equal scores keep their input order.
    pub fn rank_resumes(&self, resumes: &[&str], job_description: &str) -> Vec<RankedResume> {
        let mut ranked: Vec<RankedResume> = resumes
            .iter()
            .enumerate()
            .map(|(index, resume)| RankedResume {
                index,
                match_percentage: self.match_job(resume, job_description).match_percentage,
            })
            .collect();
        ranked.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
        ranked
    }
}

/// Human-readable tier for a match percentage.
pub fn interpret_match(percentage: f64) -> &'static str {
    if percentage >= 80.0 {
        "Excellent Match - You're a strong candidate for this position"
    } else if percentage >= 70.0 {
        "Good Match - Your profile aligns well with the job requirements"
    } else if percentage >= 60.0 {
        "Fair Match - You meet some of the job requirements"
    } else if percentage >= 50.0 {
        "Moderate Match - Consider developing additional skills"
    } else {
        "Low Match - Significant skill gap exists for this position"
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::analysis::tfidf::DEFAULT_MAX_FEATURES;
    use crate::analysis::vocabulary::SkillVocabulary;

    fn matcher() -> JobMatcher {
        let extractor = SkillExtractor::new(Arc::new(SkillVocabulary::standard().unwrap()));
        JobMatcher::new(
            extractor,
            TfidfVectorizer::new(DEFAULT_MAX_FEATURES).unwrap(),
        )
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_python_fastapi_scenario() {
        let result = matcher().match_job(
            "Experienced Python developer with FastAPI and Docker, increased performance by 40%",
            "Looking for Python, FastAPI, AWS experience",
        );
        assert!(result.matched_skills.is_superset(&set(&["Python", "FastAPI"])));
        assert!(result.missing_skills.contains("AWS"));
        assert!(
            result.match_percentage > 50.0,
            "match was {}",
            result.match_percentage
        );
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        let result = matcher().match_job("", "");
        assert_eq!(result.match_percentage, 0.0);
        assert_eq!(result.cosine_similarity, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_empty_job_description_driven_by_cosine_only() {
        let result = matcher().match_job("Rust and Python engineer", "");
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_matched_and_missing_partition_job_skills() {
        let m = matcher();
        let pairs = [
            ("Python, Docker, leadership", "Python, Kubernetes, leadership, Jira, Grafana"),
            ("", "Rust, Go via golang, teamwork"),
            ("Rust Rust Rust", "Nothing technical here at all"),
            ("Java and JavaScript", "JavaScript, TypeScript, React"),
        ];
        for (resume, job) in pairs {
            let result = m.match_job(resume, job);
            let job_skills = m.extractor.extract(job).all;
            let union: BTreeSet<String> = result
                .matched_skills
                .union(&result.missing_skills)
                .cloned()
                .collect();
            assert_eq!(union, job_skills);
            assert!(result.matched_skills.is_disjoint(&result.missing_skills));
            assert!((0.0..=100.0).contains(&result.match_percentage));
            assert!((0.0..=1.0).contains(&result.cosine_similarity));
        }
    }

    #[test]
    fn test_technical_breakdown() {
        let result = matcher().match_job(
            "Java developer, strong communication",
            "Java, JavaScript, communication, leadership",
        );
        assert_eq!(result.matched_technical_skills, set(&["Java"]));
        assert_eq!(result.missing_technical_skills, set(&["JavaScript"]));
        assert_eq!(result.missing_skills, set(&["JavaScript", "Leadership"]));
    }

    #[test]
    fn test_soft_skill_only_job_uses_neutral_technical_ratio() {
        let result = matcher().match_job("leadership", "leadership");
        // skill 1.0, technical 0.5, cosine 1.0
        assert_eq!(result.match_percentage, 85.0);

        let result = matcher().match_job(
            "Strong leadership and communication",
            "Leadership, communication, teamwork",
        );
        assert!(result.matched_technical_skills.is_empty());
        assert!(result.missing_technical_skills.is_empty());
        let expected = (0.4 * 2.0 / 3.0 + 0.3 * 0.5 + 0.3 * result.cosine_similarity) * 100.0;
        assert!(
            (result.match_percentage - expected).abs() < 0.05,
            "match was {}, expected about {expected}",
            result.match_percentage
        );
    }

    #[test]
    fn test_similarity_ignores_text_past_safety_bound() {
        let mut resume = "a ".repeat(MAX_TEXT_CHARS / 2);
        resume.push_str(" kubernetes");
        let result = matcher().match_job(&resume, "kubernetes");
        assert_eq!(result.cosine_similarity, 0.0);
        assert_eq!(result.missing_skills, set(&["Kubernetes"]));
        assert_eq!(result.match_percentage, 0.0);
    }

    #[test]
    fn test_identical_texts_score_full_marks() {
        let text = "Python FastAPI AWS Docker engineer";
        let result = matcher().match_job(text, text);
        assert_eq!(result.match_percentage, 100.0);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_rank_resumes_orders_best_first() {
        let job = "Rust engineer with Kubernetes and AWS";
        let resumes = [
            "Barista with latte art skills",
            "Rust engineer running Kubernetes on AWS",
            "Rust hobbyist",
        ];
        let ranked = matcher().rank_resumes(&resumes, job);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert!(ranked[0].match_percentage >= ranked[1].match_percentage);
    }

    #[test]
    fn test_rank_resumes_ties_keep_input_order() {
        let ranked = matcher().rank_resumes(&["", ""], "Rust");
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_match_interpretation_tiers() {
        assert!(interpret_match(85.0).starts_with("Excellent"));
        assert!(interpret_match(72.0).starts_with("Good"));
        assert!(interpret_match(60.0).starts_with("Fair"));
        assert!(interpret_match(55.0).starts_with("Moderate"));
        assert!(interpret_match(10.0).starts_with("Low"));
    }
}
