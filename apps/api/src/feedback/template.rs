// Deterministic fallback feedback, used when no provider is configured or the
// provider fails.

use async_trait::async_trait;

use crate::analysis::ats_scorer::interpret_ats_score;
use crate::feedback::{FeedbackInput, FeedbackProvider, FeedbackReport, TEMPLATE_SOURCE};
use crate::llm_client::LlmError;

/// Missing skills listed in template feedback.
pub const MAX_TEMPLATE_MISSING_SKILLS: usize = 10;

pub const STANDARD_IMPROVEMENTS: [&str; 5] = [
    "Add quantifiable achievements with specific metrics (e.g., 'Increased sales by 25%')",
    "Use strong action verbs at the start of each bullet point (e.g., 'Developed', 'Led', 'Implemented')",
    "Include relevant technical skills and tools mentioned in the job description",
    "Optimize your resume format for ATS by using standard section headings",
    "Add a professional summary highlighting your key qualifications and career objectives",
];

pub const EXAMPLE_BULLETS: [&str; 3] = [
    "Developed and implemented scalable web applications using React and Node.js, resulting in 40% faster page load times",
    "Led a cross-functional team of 5 developers to deliver a mission-critical project 2 weeks ahead of schedule",
    "Optimized database queries and reduced server response time by 35%, improving overall system performance",
];

/// Null-object provider. Never fails and never leaves the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFeedbackProvider;

impl TemplateFeedbackProvider {
    pub fn report(&self, input: &FeedbackInput<'_>) -> FeedbackReport {
        let missing_skills: Vec<String> = input
            .match_result
            .map(|m| {
                m.missing_skills
                    .iter()
                    .take(MAX_TEMPLATE_MISSING_SKILLS)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        let strengths: Vec<&str> = input.skills.all.iter().take(5).map(String::as_str).collect();
        let strengths = if strengths.is_empty() {
            "a general professional background".to_string()
        } else {
            format!("skills including {}", strengths.join(", "))
        };

        let gaps = if missing_skills.is_empty() {
            "emerging technologies".to_string()
        } else {
            missing_skills
                .iter()
                .take(3)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let total = input.breakdown.total;
        let recruiter_summary = format!(
            "Candidate demonstrates {strengths}. ATS assessment: {}. \
             To improve chances, focus on quantifying achievements and addressing skill gaps in {gaps}.",
            interpret_ats_score(total)
        );

        FeedbackReport {
            ats_score: total,
            ai_ats_score: None,
            missing_skills,
            improvements: STANDARD_IMPROVEMENTS.iter().map(|s| s.to_string()).collect(),
            rewritten_bullets: EXAMPLE_BULLETS.iter().map(|s| s.to_string()).collect(),
            recruiter_summary,
            source: TEMPLATE_SOURCE.to_string(),
        }
    }
}

#[async_trait]
impl FeedbackProvider for TemplateFeedbackProvider {
    fn name(&self) -> &'static str {
        TEMPLATE_SOURCE
    }

    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, LlmError> {
        Ok(self.report(input))
    }
}
