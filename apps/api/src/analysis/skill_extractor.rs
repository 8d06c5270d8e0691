//! Skill Extractor: maps free text to categorized canonical skills.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::text::{truncate_chars, MAX_TEXT_CHARS};
use crate::analysis::vocabulary::{SkillCategory, SkillVocabulary};

/// Skills found in a piece of text, grouped by category.
///
/// Sets are ordered so serialized output is sorted and reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillExtractionResult {
    pub all: BTreeSet<String>,
    pub technical: BTreeSet<String>,
    pub soft: BTreeSet<String>,
    pub tools: BTreeSet<String>,
}

impl SkillExtractionResult {
    pub fn len(&self) -> usize {
        self.all.len()
    }
}

/// Cheap to clone: holds only a shared handle to the compiled vocabulary.
#[derive(Debug, Clone)]
pub struct SkillExtractor {
    vocabulary: Arc<SkillVocabulary>,
}

impl SkillExtractor {
    pub fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn extract(&self, text: &str) -> SkillExtractionResult {
        let mut result = SkillExtractionResult::default();
        if text.trim().is_empty() {
            return result;
        }

        let text_lower = truncate_chars(text, MAX_TEXT_CHARS).to_lowercase();

        for entry in self.vocabulary.matches(&text_lower) {
            let name = entry.canonical.to_string();
            match entry.category {
                SkillCategory::Technical => result.technical.insert(name.clone()),
                SkillCategory::Soft => result.soft.insert(name.clone()),
                SkillCategory::Tools => result.tools.insert(name.clone()),
            };
            result.all.insert(name);
        }

        result
    }
}
