//! ATS Scorer: weighted 0–100 score over five deterministic sub-metrics.
//!
//! | Sub-metric            | Weight |
//! |-----------------------|--------|
//! | keyword density       | 40%    |
//! | formatting            | 20%    |
//! | action verbs          | 15%    |
//! | experience relevance  | 15%    |
//! | skill match           | 10%    |

use std::collections::{BTreeSet, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::skill_extractor::SkillExtractionResult;
use crate::analysis::text::{truncate_chars, word_count, MAX_TEXT_CHARS};

pub const KEYWORD_DENSITY_WEIGHT: f64 = 0.40;
pub const FORMATTING_WEIGHT: f64 = 0.20;
pub const ACTION_VERBS_WEIGHT: f64 = 0.15;
pub const EXPERIENCE_WEIGHT: f64 = 0.15;
pub const SKILL_MATCH_WEIGHT: f64 = 0.10;

// Formatting sub-scores; they sum to 100.
const EMAIL_POINTS: f64 = 15.0;
const PHONE_POINTS: f64 = 15.0;
const DATES_POINTS: f64 = 15.0;
const BULLETS_POINTS: f64 = 15.0;
const SECTIONS_POINTS: f64 = 20.0;
const LENGTH_POINTS: f64 = 20.0;

/// Distinct headers needed for the full section sub-score.
const SECTIONS_FOR_FULL_MARKS: usize = 3;
/// Below the word band but above this still earns half the length points.
const PARTIAL_LENGTH_WORDS: usize = 300;

const SECTION_HEADERS: &[&str] = &[
    "experience",
    "work history",
    "employment",
    "education",
    "skills",
    "projects",
    "certifications",
    "summary",
    "objective",
    "achievements",
];

const ACTION_VERBS: &[&str] = &[
    "achieved",
    "improved",
    "developed",
    "created",
    "designed",
    "implemented",
    "managed",
    "led",
    "coordinated",
    "executed",
    "launched",
    "established",
    "initiated",
    "built",
    "streamlined",
    "optimized",
    "increased",
    "reduced",
    "enhanced",
    "transformed",
    "delivered",
    "spearheaded",
    "pioneered",
    "orchestrated",
    "facilitated",
    "generated",
    "resolved",
    "accelerated",
    "maximized",
    "strengthened",
    "collaborated",
    "conducted",
    "analyzed",
    "evaluated",
    "strategized",
    "formulated",
    "demonstrated",
    "exceeded",
    "architected",
    "automated",
    "migrated",
    "mentored",
];

const IMPACT_VERBS: &[&str] = &[
    "increased",
    "reduced",
    "decreased",
    "improved",
    "grew",
    "saved",
    "cut",
    "boosted",
    "generated",
    "lowered",
    "raised",
    "accelerated",
];

/// Heuristic constants behind the sub-scores. Overridable via configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    /// Distinct skills needed for full keyword-density marks.
    pub skill_baseline: usize,
    /// Action-verb occurrences needed for full marks.
    pub action_verb_saturation: usize,
    /// Quantified-achievement markers needed for full marks.
    pub achievement_saturation: usize,
    /// Skill-match value used when no job skills are available.
    pub neutral_skill_match: f64,
    /// Added to keyword density at 100% overlap with the job's skills.
    pub job_overlap_bonus: f64,
    pub min_words: usize,
    pub max_words: usize,
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            skill_baseline: 15,
            action_verb_saturation: 10,
            achievement_saturation: 5,
            neutral_skill_match: 70.0,
            job_overlap_bonus: 20.0,
            min_words: 400,
            max_words: 2000,
        }
    }
}

/// Per-component scores plus the weighted total, all on a 0–100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScoreBreakdown {
    pub keyword_density: f64,
    pub formatting: f64,
    pub action_verbs: f64,
    pub experience_relevance: f64,
    pub skill_match: f64,
    pub total: f64,
}

impl AtsScoreBreakdown {
    /// Rounds each component to one decimal and derives `total` from the
    /// rounded components, so the weighted-sum invariant holds on the output.
    pub fn from_components(
        keyword_density: f64,
        formatting: f64,
        action_verbs: f64,
        experience_relevance: f64,
        skill_match: f64,
    ) -> Self {
        let keyword_density = round1(keyword_density.clamp(0.0, 100.0));
        let formatting = round1(formatting.clamp(0.0, 100.0));
        let action_verbs = round1(action_verbs.clamp(0.0, 100.0));
        let experience_relevance = round1(experience_relevance.clamp(0.0, 100.0));
        let skill_match = round1(skill_match.clamp(0.0, 100.0));

        let total = KEYWORD_DENSITY_WEIGHT * keyword_density
            + FORMATTING_WEIGHT * formatting
            + ACTION_VERBS_WEIGHT * action_verbs
            + EXPERIENCE_WEIGHT * experience_relevance
            + SKILL_MATCH_WEIGHT * skill_match;

        Self {
            keyword_density,
            formatting,
            action_verbs,
            experience_relevance,
            skill_match,
            total: round1(total.clamp(0.0, 100.0)),
        }
    }
}

/// Compiled patterns for the scorer. Build once and share.
#[derive(Debug)]
pub struct AtsScorer {
    thresholds: ScoringThresholds,
    email: Regex,
    phone: Regex,
    dates: Regex,
    line_bullet: Regex,
    section_header: Regex,
    action_verb: Regex,
    achievement_markers: Vec<Regex>,
}

impl AtsScorer {
    pub fn new(thresholds: ScoringThresholds) -> Result<Self, regex::Error> {
        let impact_verbs = IMPACT_VERBS.join("|");
        Ok(Self {
            thresholds,
            email: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")?,
            phone: Regex::new(r"(?:\+?\d{1,3}[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b")?,
            dates: Regex::new(concat!(
                r"\b(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{4}\b",
                r"|\b\d{4}\s*[-–]\s*(?:\d{4}|present|current)\b",
                r"|\b\d{1,2}/\d{4}\b",
            ))?,
            line_bullet: Regex::new(r"(?m)^\s*[-*•●▪■◦‣]\s+\S")?,
            section_header: Regex::new(&format!(r"\b(?:{})\b", SECTION_HEADERS.join("|")))?,
            action_verb: Regex::new(&format!(r"\b(?:{})\b", ACTION_VERBS.join("|")))?,
            achievement_markers: vec![
                // 40%, 12.5 %
                Regex::new(r"\d+(?:\.\d+)?\s?%")?,
                // $2M, €300, £1,200
                Regex::new(r"[$€£¥]\s?\d[\d,]*(?:\.\d+)?")?,
                // 10k users, 3x faster, 2 million
                Regex::new(
                    r"\b\d+(?:\.\d+)?\s?(?:k|m|mm|b|bn|x|thousand|million|billion)\b",
                )?,
                // increased throughput by 3 ...
                Regex::new(&format!(r"\b(?:{impact_verbs})\b[^.\n;]{{0,40}}?\d"))?,
            ],
        })
    }

    /// Scores a resume. `job_skills` are the canonical skills of a target job,
    /// if any.
    pub fn score(
        &self,
        text: &str,
        skills: &SkillExtractionResult,
        job_skills: Option<&BTreeSet<String>>,
    ) -> AtsScoreBreakdown {
        let text = truncate_chars(text, MAX_TEXT_CHARS);
        let text_lower = text.to_lowercase();
        let job_skills = job_skills.filter(|s| !s.is_empty());

        AtsScoreBreakdown::from_components(
            self.keyword_density(skills, job_skills),
            self.formatting(text, &text_lower),
            self.action_verbs(&text_lower),
            self.experience_relevance(&text_lower),
            self.skill_match(skills, job_skills),
        )
    }

    fn keyword_density(
        &self,
        skills: &SkillExtractionResult,
        job_skills: Option<&BTreeSet<String>>,
    ) -> f64 {
        let base = saturating_ratio(skills.all.len(), self.thresholds.skill_baseline) * 100.0;
        let bonus = job_skills
            .map(|job| overlap_ratio(&skills.all, job) * self.thresholds.job_overlap_bonus)
            .unwrap_or(0.0);
        (base + bonus).min(100.0)
    }

    fn formatting(&self, text: &str, text_lower: &str) -> f64 {
        let mut score = 0.0;

        if self.email.is_match(text) {
            score += EMAIL_POINTS;
        }
        if self.phone.is_match(text) {
            score += PHONE_POINTS;
        }
        if self.dates.is_match(text_lower) {
            score += DATES_POINTS;
        }
        if self.line_bullet.is_match(text) || text.contains(['•', '●', '▪', '■', '◦', '‣']) {
            score += BULLETS_POINTS;
        }

        let sections: HashSet<&str> = self
            .section_header
            .find_iter(text_lower)
            .map(|m| m.as_str())
            .collect();
        if sections.len() >= SECTIONS_FOR_FULL_MARKS {
            score += SECTIONS_POINTS;
        } else if !sections.is_empty() {
            score += SECTIONS_POINTS / 2.0;
        }

        let words = word_count(text);
        if (self.thresholds.min_words..=self.thresholds.max_words).contains(&words) {
            score += LENGTH_POINTS;
        } else if words > PARTIAL_LENGTH_WORDS {
            score += LENGTH_POINTS / 2.0;
        }

        score.min(100.0)
    }

    fn action_verbs(&self, text_lower: &str) -> f64 {
        let count = self.action_verb.find_iter(text_lower).count();
        saturating_ratio(count, self.thresholds.action_verb_saturation) * 100.0
    }

    fn experience_relevance(&self, text_lower: &str) -> f64 {
        let count: usize = self
            .achievement_markers
            .iter()
            .map(|re| re.find_iter(text_lower).count())
            .sum();
        saturating_ratio(count, self.thresholds.achievement_saturation) * 100.0
    }

    fn skill_match(
        &self,
        skills: &SkillExtractionResult,
        job_skills: Option<&BTreeSet<String>>,
    ) -> f64 {
        match job_skills {
            Some(job) => overlap_ratio(&skills.all, job) * 100.0,
            None => self.thresholds.neutral_skill_match,
        }
    }
}

/// Human-readable tier for a total ATS score.
pub fn interpret_ats_score(total: f64) -> &'static str {
    if total >= 80.0 {
        "Excellent - Your resume is highly optimized for ATS systems"
    } else if total >= 70.0 {
        "Good - Your resume should pass most ATS systems"
    } else if total >= 60.0 {
        "Fair - Your resume needs some improvements"
    } else if total >= 50.0 {
        "Poor - Your resume may not pass ATS screening"
    } else {
        "Critical - Your resume needs significant improvements"
    }
}

/// `count / target` capped at 1.0; a zero target counts as saturated.
fn saturating_ratio(count: usize, target: usize) -> f64 {
    if target == 0 {
        return 1.0;
    }
    (count as f64 / target as f64).min(1.0)
}

/// Fraction of `required` present in `have`; 0.0 when `required` is empty.
fn overlap_ratio(have: &BTreeSet<String>, required: &BTreeSet<String>) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    required.intersection(have).count() as f64 / required.len() as f64
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
