//! TF-IDF vectorization over a small in-request corpus.
//!
//! The vocabulary and idf weights are fit on the documents passed to
//! `fit_transform` and nothing else, so results depend only on the inputs.
//!
//! - tokens: lower-cased runs of two or more word characters
//! - stop words removed
//! - vocabulary: the `max_features` most frequent terms (ties alphabetical)
//! - idf: `ln((1 + n) / (1 + df)) + 1`
//! - rows: L2-normalized

use std::collections::{BTreeMap, HashSet};

use regex::Regex;

use crate::analysis::stop_words::ENGLISH_STOP_WORDS;

pub const DEFAULT_MAX_FEATURES: usize = 500;

#[derive(Debug)]
pub struct TfidfVectorizer {
    max_features: usize,
    stop_words: HashSet<&'static str>,
    token: Regex,
}

/// Dense document-term matrix; `rows[d][t]` is the weight of
/// `vocabulary[t]` in document `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfVectorizer {
    pub fn new(max_features: usize) -> Result<Self, regex::Error> {
        Ok(Self {
            max_features,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            token: Regex::new(r"\b\w\w+\b")?,
        })
    }

    fn term_counts(&self, doc: &str) -> BTreeMap<String, u32> {
        let doc = doc.to_lowercase();
        let mut counts = BTreeMap::new();
        for m in self.token.find_iter(&doc) {
            let term = m.as_str();
            if self.stop_words.contains(term) {
                continue;
            }
            *counts.entry(term.to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn fit_transform(&self, docs: &[&str]) -> TfidfMatrix {
        let per_doc: Vec<BTreeMap<String, u32>> =
            docs.iter().map(|d| self.term_counts(d)).collect();

        // corpus frequency and document frequency per term
        let mut corpus_freq: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
        for counts in &per_doc {
            for (term, &count) in counts {
                let entry = corpus_freq.entry(term.as_str()).or_insert((0, 0));
                entry.0 += count;
                entry.1 += 1;
            }
        }

        let mut ranked: Vec<(&str, u32, u32)> = corpus_freq
            .into_iter()
            .map(|(term, (freq, df))| (term, freq, df))
            .collect();
        // BTreeMap iteration is alphabetical and the sort is stable,
        // so equal frequencies keep alphabetical order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.max_features);
        ranked.sort_by(|a, b| a.0.cmp(b.0));

        let n_docs = docs.len() as f64;
        let idf: Vec<f64> = ranked
            .iter()
            .map(|&(_, _, df)| ((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = per_doc
            .iter()
            .map(|counts| {
                let mut row: Vec<f64> = ranked
                    .iter()
                    .zip(&idf)
                    .map(|(&(term, _, _), &w)| {
                        counts.get(term).copied().unwrap_or(0) as f64 * w
                    })
                    .collect();
                l2_normalize(&mut row);
                row
            })
            .collect();

        TfidfMatrix {
            vocabulary: ranked.iter().map(|&(t, _, _)| t.to_string()).collect(),
            rows,
        }
    }

    /// Fits on the pair and returns the cosine similarity of the two rows.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let matrix = self.fit_transform(&[a, b]);
        cosine_similarity(&matrix.rows[0], &matrix.rows[1])
    }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm > 0.0 {
        row.iter_mut().for_each(|x| *x /= norm);
    }
}

/// Cosine similarity clamped to [0, 1]. Zero vectors and length mismatches
/// yield 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "tf-idf dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}
