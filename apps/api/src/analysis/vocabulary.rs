//! Skill Vocabulary: curated skill tables compiled into a single `RegexSet`.
//!
//! Built once at startup and shared as `Arc<SkillVocabulary>`. Every canonical
//! skill belongs to exactly one category and every alias to exactly one
//! canonical skill; `SkillVocabulary::new` rejects tables that break this.

use std::collections::HashMap;

use regex::{RegexSet, RegexSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
    Tools,
}

/// One canonical skill: display name plus lower-case surface forms.
#[derive(Debug, Clone, Copy)]
pub struct SkillDefinition {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Whether the lower-cased canonical name is itself a surface form.
    pub match_canonical: bool,
}

const fn skill(canonical: &'static str, aliases: &'static [&'static str]) -> SkillDefinition {
    SkillDefinition {
        canonical,
        aliases,
        match_canonical: true,
    }
}

/// A skill whose display name is too ambiguous to match on its own ("Go", "R").
const fn aliased(canonical: &'static str, aliases: &'static [&'static str]) -> SkillDefinition {
    SkillDefinition {
        canonical,
        aliases,
        match_canonical: false,
    }
}

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Skill '{0}' is defined more than once")]
    DuplicateSkill(String),

    #[error("Alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Skill '{0}' has an empty alias")]
    EmptyAlias(String),

    #[error("Failed to compile skill patterns: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone)]
pub struct VocabularyEntry {
    pub canonical: &'static str,
    pub category: SkillCategory,
}

/// Compiled, immutable skill vocabulary.
#[derive(Debug)]
pub struct SkillVocabulary {
    entries: Vec<VocabularyEntry>,
    patterns: RegexSet,
    /// patterns[i] belongs to entries[pattern_owner[i]]
    pattern_owner: Vec<usize>,
}

impl SkillVocabulary {
    /// Compiles the built-in technical, soft-skill and tool tables.
    pub fn standard() -> Result<Self, VocabularyError> {
        Self::new(&[
            (SkillCategory::Technical, TECHNICAL_SKILLS),
            (SkillCategory::Soft, SOFT_SKILLS),
            (SkillCategory::Tools, TOOLS),
        ])
    }

    pub fn new(
        tables: &[(SkillCategory, &'static [SkillDefinition])],
    ) -> Result<Self, VocabularyError> {
        let mut entries = Vec::new();
        let mut pattern_sources = Vec::new();
        let mut pattern_owner = Vec::new();
        let mut seen_canonical: HashMap<String, usize> = HashMap::new();
        let mut seen_alias: HashMap<String, &'static str> = HashMap::new();

        for (category, definitions) in tables {
            for def in definitions.iter() {
                let canonical_key = def.canonical.to_lowercase();
                if seen_canonical.contains_key(&canonical_key) {
                    return Err(VocabularyError::DuplicateSkill(def.canonical.to_string()));
                }
                let entry_idx = entries.len();
                seen_canonical.insert(canonical_key.clone(), entry_idx);
                entries.push(VocabularyEntry {
                    canonical: def.canonical,
                    category: *category,
                });

                let mut forms: Vec<String> = Vec::new();
                if def.match_canonical {
                    forms.push(canonical_key);
                }
                for alias in def.aliases {
                    let alias = alias.trim().to_lowercase();
                    if alias.is_empty() {
                        return Err(VocabularyError::EmptyAlias(def.canonical.to_string()));
                    }
                    if !forms.contains(&alias) {
                        forms.push(alias);
                    }
                }
                if forms.is_empty() {
                    return Err(VocabularyError::EmptyAlias(def.canonical.to_string()));
                }

                for form in forms {
                    if let Some(first) = seen_alias.get(&form) {
                        return Err(VocabularyError::DuplicateAlias {
                            alias: form,
                            first: first.to_string(),
                            second: def.canonical.to_string(),
                        });
                    }
                    pattern_sources.push(whole_word_pattern(&form));
                    pattern_owner.push(entry_idx);
                    seen_alias.insert(form, def.canonical);
                }
            }
        }

        let patterns = RegexSetBuilder::new(&pattern_sources)
            .size_limit(64 * (1 << 20))
            .build()?;

        Ok(Self {
            entries,
            patterns,
            pattern_owner,
        })
    }

    /// Returns every vocabulary entry with at least one alias present in
    /// `text_lower`, which must already be lower-cased.
    pub fn matches<'a>(&'a self, text_lower: &str) -> impl Iterator<Item = &'a VocabularyEntry> + 'a {
        let mut hit = vec![false; self.entries.len()];
        for pattern_idx in self.patterns.matches(text_lower).into_iter() {
            hit[self.pattern_owner[pattern_idx]] = true;
        }
        self.entries
            .iter()
            .zip(hit)
            .filter_map(|(entry, is_hit)| is_hit.then_some(entry))
    }

    /// Looks up the category of a canonical skill name (case-insensitive).
    #[cfg(test)]
    pub fn category_of(&self, canonical: &str) -> Option<SkillCategory> {
        self.entries
            .iter()
            .find(|e| e.canonical.eq_ignore_ascii_case(canonical))
            .map(|e| e.category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Builds a whole-word pattern for a lower-case alias.
///
/// Word characters are `[0-9a-z_]`. Boundaries are explicit character classes
/// rather than `\b` so that aliases ending in symbols ("c++", "c#") still
/// match. Spaces inside an alias match any whitespace run.
fn whole_word_pattern(alias: &str) -> String {
    let body = alias
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    format!(r"(?:^|[^0-9a-z_]){body}(?:[^0-9a-z_]|$)")
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in tables
// ────────────────────────────────────────────────────────────────────────────

pub const TECHNICAL_SKILLS: &[SkillDefinition] = &[
    // Programming languages
    skill("Python", &["python3"]),
    skill("Java", &[]),
    skill("JavaScript", &["ecmascript"]),
    skill("TypeScript", &[]),
    skill("C++", &["cpp"]),
    skill("C#", &["csharp"]),
    skill("Ruby", &[]),
    skill("PHP", &[]),
    skill("Swift", &[]),
    skill("Kotlin", &[]),
    aliased("Go", &["golang", "go lang"]),
    skill("Rust", &[]),
    skill("Scala", &[]),
    aliased("R", &["r programming", "r language", "rstudio"]),
    skill("MATLAB", &[]),
    skill("Perl", &[]),
    skill("Shell", &["shell scripting"]),
    skill("Bash", &[]),
    skill("PowerShell", &[]),
    skill("SQL", &[]),
    // Web technologies
    skill("HTML", &["html5"]),
    skill("CSS", &["css3"]),
    skill("React", &["reactjs", "react.js"]),
    skill("Angular", &["angularjs"]),
    skill("Vue", &["vuejs", "vue.js"]),
    skill("Node.js", &["nodejs", "node js"]),
    aliased("Express", &["expressjs", "express.js"]),
    skill("Django", &[]),
    skill("Flask", &[]),
    skill("FastAPI", &[]),
    aliased("Spring", &["spring boot", "springboot", "spring framework"]),
    skill("ASP.NET", &[]),
    skill("Laravel", &[]),
    skill("Rails", &["ruby on rails"]),
    skill("jQuery", &[]),
    skill("Bootstrap", &[]),
    skill("Tailwind", &["tailwindcss", "tailwind css"]),
    skill("Sass", &["scss"]),
    skill("Webpack", &[]),
    // Databases
    skill("MySQL", &[]),
    skill("PostgreSQL", &["postgres"]),
    skill("MongoDB", &["mongo"]),
    skill("Redis", &[]),
    skill("Oracle", &[]),
    skill("SQL Server", &["mssql"]),
    skill("SQLite", &[]),
    skill("Cassandra", &[]),
    skill("DynamoDB", &[]),
    skill("Elasticsearch", &[]),
    skill("Firebase", &[]),
    skill("MariaDB", &[]),
    skill("Neo4j", &[]),
    // Cloud & DevOps
    skill("AWS", &["amazon web services"]),
    skill("Azure", &[]),
    skill("GCP", &["google cloud", "google cloud platform"]),
    skill("Docker", &[]),
    skill("Kubernetes", &["k8s"]),
    skill("Jenkins", &[]),
    skill("GitLab", &[]),
    skill("GitHub", &[]),
    skill("CI/CD", &["cicd", "continuous integration"]),
    skill("Terraform", &[]),
    skill("Ansible", &[]),
    skill("Chef", &[]),
    skill("Puppet", &[]),
    skill("CircleCI", &[]),
    skill("Travis CI", &["travisci"]),
    // AI / ML
    skill("TensorFlow", &[]),
    skill("PyTorch", &[]),
    skill("Keras", &[]),
    skill("scikit-learn", &["sklearn", "scikit learn"]),
    skill("Pandas", &[]),
    skill("NumPy", &[]),
    skill("OpenCV", &[]),
    skill("NLP", &["natural language processing"]),
    skill("Machine Learning", &[]),
    skill("Deep Learning", &[]),
    skill("Neural Networks", &["neural network"]),
    skill("Computer Vision", &[]),
    skill("Data Science", &[]),
    // Platforms
    skill("Git", &[]),
    skill("Linux", &[]),
    skill("Unix", &[]),
    skill("Windows", &[]),
    skill("macOS", &[]),
    skill("Jira", &[]),
    skill("Confluence", &[]),
    skill("Slack", &[]),
    skill("Notion", &[]),
    skill("Figma", &[]),
    skill("Adobe", &[]),
    skill("Photoshop", &[]),
    skill("Illustrator", &[]),
    skill("Sketch", &[]),
    skill("InVision", &[]),
    // Methodologies
    skill("Agile", &[]),
    skill("Scrum", &[]),
    skill("Kanban", &[]),
    skill("DevOps", &[]),
    skill("Microservices", &["microservice"]),
    skill("REST API", &["rest apis", "restful", "restful api"]),
    skill("GraphQL", &[]),
    skill("SOAP", &[]),
    skill("TDD", &["test-driven development", "test driven development"]),
    skill("BDD", &[]),
    skill("OAuth", &["oauth2"]),
    skill("JWT", &[]),
    skill("WebSocket", &["websockets"]),
    skill("gRPC", &[]),
    // Programming practices
    skill(
        "OOP",
        &["object-oriented programming", "object oriented programming"],
    ),
    skill("Functional Programming", &[]),
    skill("Data Structures", &["data structure"]),
    skill("Algorithms", &["algorithm"]),
    skill("Design Patterns", &["design pattern"]),
    skill("API Development", &[]),
    skill("Database Design", &[]),
    skill("UI/UX", &[]),
    skill("Frontend", &["front-end", "front end"]),
    skill("Backend", &["back-end", "back end"]),
    skill("Full Stack", &["full-stack", "fullstack"]),
];

pub const SOFT_SKILLS: &[SkillDefinition] = &[
    skill("Leadership", &[]),
    skill("Communication", &[]),
    skill("Teamwork", &[]),
    skill("Problem Solving", &["problem-solving"]),
    skill("Critical Thinking", &[]),
    skill("Time Management", &[]),
    skill("Adaptability", &[]),
    skill("Creativity", &[]),
    skill("Collaboration", &[]),
    skill("Analytical", &[]),
    skill("Decision Making", &["decision-making"]),
    skill("Interpersonal", &[]),
    skill("Presentation", &["public speaking"]),
    skill("Negotiation", &[]),
    skill("Conflict Resolution", &[]),
    skill("Emotional Intelligence", &[]),
    skill("Mentoring", &[]),
    skill("Coaching", &[]),
    skill("Strategic Thinking", &[]),
    skill("Innovation", &[]),
    skill("Customer Service", &[]),
    skill("Attention to Detail", &[]),
    skill("Multitasking", &["multi-tasking"]),
    skill("Organization", &[]),
    skill("Self-Motivated", &["self motivated"]),
];

pub const TOOLS: &[SkillDefinition] = &[
    skill("VS Code", &["vscode"]),
    skill("Visual Studio", &[]),
    skill("IntelliJ", &["intellij idea"]),
    skill("PyCharm", &[]),
    skill("Eclipse", &[]),
    skill("Sublime Text", &["sublime"]),
    aliased("Atom", &["atom editor"]),
    skill("Postman", &[]),
    skill("Insomnia", &[]),
    skill("Swagger", &["openapi"]),
    skill("Tableau", &[]),
    skill("Power BI", &["powerbi"]),
    skill("Excel", &["microsoft excel"]),
    skill("Microsoft Word", &["ms word"]),
    skill("PowerPoint", &[]),
    skill("Trello", &[]),
    skill("Asana", &[]),
    skill("Monday.com", &[]),
    skill("Salesforce", &[]),
    skill("HubSpot", &[]),
    skill("Google Analytics", &[]),
    skill("Mixpanel", &[]),
    skill("Amplitude", &[]),
    aliased("Segment", &["segment.io"]),
    skill("Datadog", &[]),
    skill("New Relic", &[]),
    skill("Splunk", &[]),
    skill("Grafana", &[]),
    skill("Prometheus", &[]),
];
