// Feedback Generator: natural-language improvement advice.
//
// A configured provider writes the report; the template provider stands in
// whenever there is no provider or the provider fails. Callers always get a
// report back.

pub mod prompts;
pub mod template;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::ats_scorer::AtsScoreBreakdown;
use crate::analysis::matcher::MatchResult;
use crate::analysis::skill_extractor::SkillExtractionResult;
use crate::config::{Config, ProviderKind};
use crate::llm_client::{call_json, GeminiClient, LlmError, OpenAiClient, TextGenerator};

pub use template::TemplateFeedbackProvider;

pub const TEMPLATE_SOURCE: &str = "template";

/// Everything a provider may use to write feedback. Borrowed from the request.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackInput<'a> {
    pub resume_text: &'a str,
    pub skills: &'a SkillExtractionResult,
    pub breakdown: &'a AtsScoreBreakdown,
    pub match_result: Option<&'a MatchResult>,
    pub job_description: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackReport {
    /// Heuristic ATS total; always ours, never the provider's.
    pub ats_score: f64,
    /// The provider's own 0-100 estimate, when it gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_ats_score: Option<f64>,
    pub missing_skills: Vec<String>,
    pub improvements: Vec<String>,
    pub rewritten_bullets: Vec<String>,
    pub recruiter_summary: String,
    /// `"openai"`, `"gemini"` or `"template"`.
    pub source: String,
}

impl FeedbackReport {
    /// Plain-text rendering returned as the `feedback` string.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.missing_skills.is_empty() {
            out.push_str(&format!(
                "Add the following skills to improve your match: {}.\n\n",
                self.missing_skills.join(", ")
            ));
        }

        out.push_str(&format!("ATS score: {:.1}/100\n", self.ats_score));
        out.push_str(&self.recruiter_summary);
        out.push('\n');

        if !self.improvements.is_empty() {
            out.push_str("\nImprovements:\n");
            for (i, item) in self.improvements.iter().enumerate() {
                out.push_str(&format!("{}. {item}\n", i + 1));
            }
        }

        if !self.rewritten_bullets.is_empty() {
            out.push_str("\nSuggested bullet points:\n");
            for bullet in &self.rewritten_bullets {
                out.push_str(&format!("- {bullet}\n"));
            }
        }

        out
    }
}

/// Writes a `FeedbackReport` from the analysis results.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, LlmError>;
}

/// Shape the provider is asked to return. Every field is optional on the wire.
#[derive(Debug, Deserialize)]
struct LlmFeedback {
    #[serde(default)]
    ats_score: Option<f64>,
    #[serde(default)]
    missing_skills: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    rewritten_bullets: Vec<String>,
    #[serde(default)]
    recruiter_summary: String,
}

/// Feedback written by any `TextGenerator`.
pub struct LlmFeedbackProvider {
    generator: Arc<dyn TextGenerator>,
}

impl LlmFeedbackProvider {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl FeedbackProvider for LlmFeedbackProvider {
    fn name(&self) -> &'static str {
        self.generator.name()
    }

    async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, LlmError> {
        let system = prompts::feedback_system();
        let prompt = prompts::feedback_prompt(input);
        let reply: LlmFeedback = call_json(self.generator.as_ref(), &system, &prompt).await?;

        let recruiter_summary = reply.recruiter_summary.trim().to_string();
        if recruiter_summary.is_empty() && reply.improvements.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        // Prefer the provider's gap list; fall back to the extracted one.
        let missing_skills = if reply.missing_skills.is_empty() {
            input
                .match_result
                .map(|m| m.missing_skills.iter().cloned().collect())
                .unwrap_or_default()
        } else {
            reply.missing_skills
        };

        Ok(FeedbackReport {
            ats_score: input.breakdown.total,
            ai_ats_score: reply
                .ats_score
                .filter(|s| s.is_finite())
                .map(|s| s.clamp(0.0, 100.0)),
            missing_skills,
            improvements: reply.improvements,
            rewritten_bullets: reply.rewritten_bullets,
            recruiter_summary,
            source: self.generator.name().to_string(),
        })
    }
}

/// Runs the configured provider under a timeout and falls back to the
/// template on any failure.
pub struct FeedbackGenerator {
    provider: Arc<dyn FeedbackProvider>,
    fallback: TemplateFeedbackProvider,
    timeout: Duration,
}

impl FeedbackGenerator {
    pub fn new(provider: Arc<dyn FeedbackProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            fallback: TemplateFeedbackProvider,
            timeout,
        }
    }

    #[cfg(test)]
    pub fn template_only() -> Self {
        Self::new(Arc::new(TemplateFeedbackProvider), Duration::from_secs(1))
    }

    /// Selects the provider named by `AI_PROVIDER`. A selected provider
    /// without an API key degrades to the template with a warning.
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator: Option<Arc<dyn TextGenerator>> = match config.ai_provider {
            ProviderKind::None => None,
            ProviderKind::OpenAi => match &config.openai_api_key {
                Some(key) => Some(Arc::new(
                    OpenAiClient::new(
                        key.clone(),
                        config.openai_model.clone(),
                        config.feedback_timeout,
                    )
                    .context("Failed to build OpenAI client")?,
                )),
                None => {
                    warn!("AI_PROVIDER=openai but OPENAI_API_KEY is not set; using template feedback");
                    None
                }
            },
            ProviderKind::Gemini => match &config.gemini_api_key {
                Some(key) => Some(Arc::new(
                    GeminiClient::new(
                        key.clone(),
                        config.gemini_model.clone(),
                        config.feedback_timeout,
                    )
                    .context("Failed to build Gemini client")?,
                )),
                None => {
                    warn!("AI_PROVIDER=gemini but GEMINI_API_KEY is not set; using template feedback");
                    None
                }
            },
        };

        let provider: Arc<dyn FeedbackProvider> = match generator {
            Some(generator) => Arc::new(LlmFeedbackProvider::new(generator)),
            None => Arc::new(TemplateFeedbackProvider),
        };
        info!(provider = provider.name(), "Feedback provider selected");

        Ok(Self::new(provider, config.feedback_timeout))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn report(&self, input: &FeedbackInput<'_>) -> FeedbackReport {
        let provider = self.provider.name();
        match tokio::time::timeout(self.timeout, self.provider.generate(input)).await {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                warn!(provider, error = %e, "Feedback provider failed; using template");
                self.fallback.report(input)
            }
            Err(_) => {
                let e = LlmError::Timeout(self.timeout);
                warn!(provider, error = %e, "Feedback provider failed; using template");
                self.fallback.report(input)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Fixture {
        skills: SkillExtractionResult,
        breakdown: AtsScoreBreakdown,
        result: MatchResult,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                skills: SkillExtractionResult {
                    all: set(&["Python", "FastAPI"]),
                    technical: set(&["Python", "FastAPI"]),
                    ..Default::default()
                },
                breakdown: AtsScoreBreakdown::from_components(40.0, 60.0, 20.0, 0.0, 50.0),
                result: MatchResult {
                    matched_skills: set(&["Python", "FastAPI"]),
                    missing_skills: set(&["AWS"]),
                    ..Default::default()
                },
            }
        }

        fn input(&self) -> FeedbackInput<'_> {
            FeedbackInput {
                resume_text: "Python developer with FastAPI experience",
                skills: &self.skills,
                breakdown: &self.breakdown,
                match_result: Some(&self.result),
                job_description: Some("Python, FastAPI, AWS"),
            }
        }
    }

    struct CannedGenerator(&'static str);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        fn name(&self) -> &'static str {
            "openai"
        }

        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl FeedbackProvider for FailingProvider {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn generate(&self, _input: &FeedbackInput<'_>) -> Result<FeedbackReport, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "unavailable".into(),
            })
        }
    }

    struct SlowProvider;

    #[async_trait]
    impl FeedbackProvider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn generate(&self, input: &FeedbackInput<'_>) -> Result<FeedbackReport, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let mut report = TemplateFeedbackProvider.report(input);
            report.source = "slow".into();
            Ok(report)
        }
    }

    #[tokio::test]
    async fn test_llm_provider_uses_reply_and_keeps_heuristic_score() {
        let generator = CannedGenerator(
            r#"```json
{"ats_score": 64, "missing_skills": ["AWS", "Docker"],
 "improvements": ["Quantify impact"], "rewritten_bullets": ["Built APIs"],
 "recruiter_summary": "Solid backend engineer."}
```"#,
        );
        let provider = LlmFeedbackProvider::new(Arc::new(generator));
        let fixture = Fixture::new();

        let report = provider.generate(&fixture.input()).await.unwrap();
        assert_eq!(report.source, "openai");
        assert_eq!(report.ats_score, fixture.breakdown.total);
        assert_eq!(report.ai_ats_score, Some(64.0));
        assert_eq!(report.missing_skills, vec!["AWS", "Docker"]);
        assert_eq!(report.recruiter_summary, "Solid backend engineer.");
    }

    #[tokio::test]
    async fn test_llm_provider_without_gap_list_uses_extracted_gaps() {
        let generator = CannedGenerator(r#"{"recruiter_summary": "Strong Python background."}"#);
        let provider = LlmFeedbackProvider::new(Arc::new(generator));
        let fixture = Fixture::new();

        let report = provider.generate(&fixture.input()).await.unwrap();
        assert_eq!(report.missing_skills, vec!["AWS"]);
    }

    #[tokio::test]
    async fn test_llm_provider_rejects_empty_reply() {
        let provider = LlmFeedbackProvider::new(Arc::new(CannedGenerator("{}")));
        let fixture = Fixture::new();
        let err = provider.generate(&fixture.input()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_template() {
        let generator = FeedbackGenerator::new(Arc::new(FailingProvider), Duration::from_secs(5));
        let fixture = Fixture::new();

        let report = generator.report(&fixture.input()).await;
        assert_eq!(report.source, TEMPLATE_SOURCE);
        assert!(report.render().contains("AWS"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out_to_template() {
        let generator = FeedbackGenerator::new(Arc::new(SlowProvider), Duration::from_secs(15));
        let fixture = Fixture::new();

        let report = generator.report(&fixture.input()).await;
        assert_eq!(report.source, TEMPLATE_SOURCE);
    }

    #[tokio::test]
    async fn test_malformed_provider_output_falls_back() {
        let provider = LlmFeedbackProvider::new(Arc::new(CannedGenerator("not json at all")));
        let generator = FeedbackGenerator::new(Arc::new(provider), Duration::from_secs(5));
        let fixture = Fixture::new();

        let text = generator.report(&fixture.input()).await.render();
        assert!(text.starts_with("Add the following skills to improve your match: AWS"));
    }

    #[test]
    fn test_missing_key_selects_template() {
        let config = Config {
            ai_provider: ProviderKind::OpenAi,
            openai_api_key: None,
            ..Config::default()
        };
        let generator = FeedbackGenerator::from_config(&config).unwrap();
        assert_eq!(generator.provider_name(), TEMPLATE_SOURCE);
    }

    #[test]
    fn test_configured_key_selects_provider() {
        let config = Config {
            ai_provider: ProviderKind::Gemini,
            gemini_api_key: Some("test-key".into()),
            ..Config::default()
        };
        let generator = FeedbackGenerator::from_config(&config).unwrap();
        assert_eq!(generator.provider_name(), "gemini");
    }

    #[test]
    fn test_render_numbers_improvements() {
        let report = FeedbackReport {
            ats_score: 72.5,
            ai_ats_score: None,
            missing_skills: vec![],
            improvements: vec!["First".into(), "Second".into()],
            rewritten_bullets: vec!["Shipped X".into()],
            recruiter_summary: "Good fit.".into(),
            source: "openai".into(),
        };
        let text = report.render();
        assert!(text.starts_with("ATS score: 72.5/100"));
        assert!(text.contains("1. First\n2. Second"));
        assert!(text.contains("- Shipped X"));
    }
}
