// src/learning.rs
use crate::core::aggregator::RootStats;
use crate::core::tokenizer::TokenizedCorpus;
use crate::vocabulary::{Vocabulary, VocabularyUpdates};
use std::collections::{BTreeMap, BTreeSet};

/// Well-known irregular plurals recognised even before they are configured.
pub const AUTO_IRREGULAR_LOOKUP: &[(&str, &str)] = &[
    ("children", "child"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("indices", "index"),
    ("appendices", "appendix"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("theses", "thesis"),
    ("phenomena", "phenomenon"),
    ("criteria", "criterion"),
    ("algae", "alga"),
    ("fungi", "fungus"),
    ("cacti", "cactus"),
    ("nuclei", "nucleus"),
    ("syllabi", "syllabus"),
];

/// Longest token that may be learned as a stopword.
const MAX_STOPWORD_CHARS: usize = 4;

/// Proposes vocabulary additions from the statistics of a finished run.
/// Learning only affects later runs; the current output is never recomputed.
pub struct VocabularyLearner {
    auto_irregulars: BTreeMap<&'static str, &'static str>,
}

impl VocabularyLearner {
    pub fn new() -> Self {
        Self { auto_irregulars: AUTO_IRREGULAR_LOOKUP.iter().copied().collect() }
    }

    pub fn learn(&self, corpus: &TokenizedCorpus, vocabulary: &Vocabulary, roots: &RootStats) -> VocabularyUpdates {
        VocabularyUpdates {
            new_irregular_singulars: self.detect_irregulars(corpus, vocabulary),
            new_stopwords: self.detect_stopwords(corpus, vocabulary, roots),
        }
    }

    /// Raw tokens that are known irregular plurals, or `-ves` plurals whose
    /// `-f`/`-fe` singular was also observed.
    fn detect_irregulars(&self, corpus: &TokenizedCorpus, vocabulary: &Vocabulary) -> BTreeMap<String, String> {
        let mut found = BTreeMap::new();
        for token in &corpus.raw_tokens {
            if vocabulary.irregular_singulars.contains_key(token) || found.contains_key(token) {
                continue;
            }
            if let Some(&singular) = self.auto_irregulars.get(token.as_str()) {
                found.insert(token.clone(), singular.to_string());
                continue;
            }
            if token.chars().count() <= 3 {
                continue;
            }
            if let Some(stem) = token.strip_suffix("ves") {
                let observed = [format!("{stem}f"), format!("{stem}fe")]
                    .into_iter()
                    .find(|c| corpus.raw_tokens.contains(c) || corpus.normalized_tokens.contains(c));
                if let Some(singular) = observed {
                    found.insert(token.clone(), singular);
                }
            }
        }
        found
    }

    /// Short alphabetic tokens present in at least `stopword_threshold` of the
    /// rows that never became a root key of this run.
    fn detect_stopwords(&self, corpus: &TokenizedCorpus, vocabulary: &Vocabulary, roots: &RootStats) -> BTreeSet<String> {
        let total = corpus.total_rows();
        let mut found = BTreeSet::new();
        if total == 0 {
            return found;
        }
        for (token, &count) in &corpus.doc_freq {
            if vocabulary.is_stopword(token) || roots.contains(token) {
                continue;
            }
            let ratio = count as f64 / total as f64;
            let short_word = !token.is_empty()
                && token.chars().all(char::is_alphabetic)
                && token.chars().count() <= MAX_STOPWORD_CHARS;
            if ratio >= vocabulary.stopword_threshold && short_word {
                found.insert(token.clone());
            }
        }
        found
    }
}

impl Default for VocabularyLearner {
    fn default() -> Self {
        Self::new()
    }
}
