use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::analysis::ats_scorer::ScoringThresholds;

const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";
const DEFAULT_FEEDBACK_TIMEOUT_SECS: u64 = 15;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Which text-generation backend writes feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    /// Deterministic template only.
    #[default]
    None,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            "none" | "template" | "" => Ok(Self::None),
            other => bail!("AI_PROVIDER must be one of openai, gemini, none (got '{other}')"),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OpenAi => "openai",
            Self::Gemini => "gemini",
            Self::None => "none",
        })
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ai_provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub feedback_timeout: Duration,
    pub max_upload_bytes: usize,
    pub thresholds: ScoringThresholds,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            ai_provider: ProviderKind::None,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            feedback_timeout: Duration::from_secs(DEFAULT_FEEDBACK_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            thresholds: ScoringThresholds::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout_secs: u64 =
            parse_var(&var, "FEEDBACK_TIMEOUT_SECS", DEFAULT_FEEDBACK_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            bail!("FEEDBACK_TIMEOUT_SECS must be greater than zero");
        }

        let max_upload_bytes: usize =
            parse_var(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        if max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }

        let base = defaults.thresholds.clone();
        let thresholds = ScoringThresholds {
            skill_baseline: parse_var(&var, "ATS_SKILL_BASELINE", base.skill_baseline)?,
            action_verb_saturation: parse_var(
                &var,
                "ATS_ACTION_VERB_SATURATION",
                base.action_verb_saturation,
            )?,
            achievement_saturation: parse_var(
                &var,
                "ATS_ACHIEVEMENT_SATURATION",
                base.achievement_saturation,
            )?,
            neutral_skill_match: parse_var(
                &var,
                "ATS_NEUTRAL_SKILL_MATCH",
                base.neutral_skill_match,
            )?,
            ..base
        };
        if !(0.0..=100.0).contains(&thresholds.neutral_skill_match) {
            bail!("ATS_NEUTRAL_SKILL_MATCH must be between 0 and 100");
        }

        Ok(Config {
            port: parse_var(&var, "PORT", defaults.port)?,
            rust_log: var("RUST_LOG").unwrap_or(defaults.rust_log),
            ai_provider: parse_var(&var, "AI_PROVIDER", defaults.ai_provider)?,
            openai_api_key: var("OPENAI_API_KEY"),
            openai_model: var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            feedback_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes,
            thresholds,
        })
    }
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match var(key) {
        Some(raw) => {
            let parsed: Result<T> = raw.trim().parse::<T>().map_err(Into::into);
            parsed.with_context(|| format!("{key} has an invalid value: '{raw}'"))
        }
        None => Ok(default),
    }
}
