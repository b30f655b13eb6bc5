// File: src/core/tokenizer.rs
use crate::core::types::{KeywordRow, TokenSequence};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// A token is a run of word characters, where a decimal number such as `2.5`
/// counts as part of the run so the dot never splits it.
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\d+\.\d+|\w)+").expect("token pattern compiles"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\d+$").expect("decimal pattern compiles"));

/// Suffixes reduced by dropping their last two characters.
const ES_SUFFIXES: [&str; 6] = ["ses", "xes", "zes", "ches", "shes", "oes"];

/// Folds a plural token to its singular form.
///
/// An exact irregular entry wins. Otherwise the first matching suffix rule is
/// applied (only to tokens longer than three characters) and the reduced form
/// is looked up in the irregular map once more.
pub fn singularize(token: &str, irregulars: &HashMap<String, String>) -> String {
    if let Some(singular) = irregulars.get(token) {
        return singular.clone();
    }

    let candidate: Cow<str> = if token.chars().count() <= 3 {
        Cow::Borrowed(token)
    } else if let Some(stem) = token.strip_suffix("ies") {
        Cow::Owned(format!("{stem}y"))
    } else if ES_SUFFIXES.iter().any(|suffix| token.ends_with(suffix)) {
        Cow::Borrowed(&token[..token.len() - 2])
    } else if token.ends_with('s') && !token.ends_with("ss") {
        Cow::Borrowed(&token[..token.len() - 1])
    } else {
        Cow::Borrowed(token)
    };

    match irregulars.get(candidate.as_ref()) {
        Some(singular) => singular.clone(),
        None => candidate.into_owned(),
    }
}

/// Splits a keyword into raw and normalized tokens.
/// O(n) in the keyword length.
pub fn tokenize(term: &str, irregulars: &HashMap<String, String>) -> TokenSequence {
    let lowered = term.to_lowercase();
    let raw: Vec<String> = TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect();

    let normalized = raw
        .iter()
        .map(|token| {
            if DECIMAL_RE.is_match(token) {
                token.clone()
            } else {
                singularize(token, irregulars)
            }
        })
        .filter(|token| !token.is_empty())
        .collect();

    TokenSequence { normalized, raw }
}

/// Per-row tokens plus the corpus-wide token statistics the learner needs.
#[derive(Debug, Default)]
pub struct TokenizedCorpus {
    pub rows: Vec<TokenSequence>,
    /// Normalized token -> number of distinct rows containing it.
    pub doc_freq: HashMap<String, u64>,
    pub raw_tokens: HashSet<String>,
    pub normalized_tokens: HashSet<String>,
}

impl TokenizedCorpus {
    pub fn build(rows: &[KeywordRow], irregulars: &HashMap<String, String>) -> Self {
        let mut corpus = TokenizedCorpus {
            rows: Vec::with_capacity(rows.len()),
            ..Default::default()
        };

        for row in rows {
            let tokens = tokenize(&row.keyword, irregulars);
            corpus.raw_tokens.extend(tokens.raw.iter().cloned());

            let unique: HashSet<&String> = tokens.normalized.iter().collect();
            for token in unique {
                *corpus.doc_freq.entry(token.clone()).or_insert(0) += 1;
                corpus.normalized_tokens.insert(token.clone());
            }
            corpus.rows.push(tokens);
        }
        corpus
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::VocabularyConfig;

    fn irregulars() -> HashMap<String, String> {
        VocabularyConfig::default().active().irregular_singulars
    }

    #[test]
    fn test_suffix_rules() {
        let map = HashMap::new();
        assert_eq!(singularize("puppies", &map), "puppy");
        assert_eq!(singularize("glasses", &map), "glass");
        assert_eq!(singularize("boxes", &map), "box");
        assert_eq!(singularize("quizzes", &map), "quizz");
        assert_eq!(singularize("watches", &map), "watch");
        assert_eq!(singularize("brushes", &map), "brush");
        assert_eq!(singularize("potatoes", &map), "potato");
        assert_eq!(singularize("toys", &map), "toy");
        assert_eq!(singularize("glass", &map), "glass");
        // three characters or fewer are left alone
        assert_eq!(singularize("ies", &map), "ies");
        assert_eq!(singularize("bus", &map), "bus");
        assert_eq!(singularize("cds", &map), "cds");
    }

    #[test]
    fn test_irregular_map_before_and_after_suffix_rules() {
        let mut map = HashMap::new();
        map.insert("men".to_string(), "man".to_string());
        map.insert("calf".to_string(), "calf".to_string());
        map.insert("gizmo".to_string(), "gadget".to_string());
        assert_eq!(singularize("men", &map), "man");
        // "gizmos" -> "gizmo" by suffix, then remapped
        assert_eq!(singularize("gizmos", &map), "gadget");
    }

    #[test]
    fn test_singular_words_are_stable() {
        let map = irregulars();
        for word in ["toy", "glass", "child", "box", "watch", "underwear", "thermal", "kid"] {
            let once = singularize(word, &map);
            assert_eq!(singularize(&once, &map), once, "{word}");
            assert_eq!(tokenize(&once, &map).normalized, vec![once.clone()]);
        }
    }

    #[test]
    fn test_tokenize_strips_punctuation_and_case() {
        let tokens = tokenize("Men's Thermal-Underwear!!", &irregulars());
        assert_eq!(tokens.raw, vec!["men", "s", "thermal", "underwear"]);
        assert_eq!(tokens.normalized, vec!["man", "s", "thermal", "underwear"]);
    }

    #[test]
    fn test_decimals_are_protected() {
        let tokens = tokenize("USB 3.0 cables, 1.5 lbs", &irregulars());
        assert_eq!(tokens.raw, vec!["usb", "3.0", "cables", "1.5", "lbs"]);
        assert_eq!(tokens.normalized, vec!["usb", "3.0", "cable", "1.5", "lb"]);
    }

    #[test]
    fn test_decimal_glued_to_letters_stays_one_token() {
        let tokens = tokenize("v2.5x", &HashMap::new());
        assert_eq!(tokens.raw, vec!["v2.5x"]);
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokenize("", &irregulars());
        assert!(tokens.raw.is_empty());
        assert!(tokens.normalized.is_empty());
        assert_eq!(tokenize(" -- !! ", &irregulars()), TokenSequence::default());
    }

    #[test]
    fn test_corpus_document_frequency_counts_rows_once() {
        let rows = vec![
            KeywordRow::new("toy toys", 1),
            KeywordRow::new("red toy", 2),
            KeywordRow::new("", 3),
        ];
        let corpus = TokenizedCorpus::build(&rows, &HashMap::new());
        assert_eq!(corpus.total_rows(), 3);
        assert_eq!(corpus.doc_freq["toy"], 2);
        assert_eq!(corpus.doc_freq["red"], 1);
        assert!(corpus.raw_tokens.contains("toys"));
        assert!(!corpus.normalized_tokens.contains("toys"));
    }
}
