// src/vocabulary.rs
use crate::error::{Result, RootError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

pub const DEFAULT_STOPWORD_THRESHOLD: f64 = 0.9;

/// Stopwords that are always active, whatever the persisted overlay says.
pub const DEFAULT_STOPWORDS: &[&str] = &["and", "for", "of", "on", "with", "the", "a", "an", "mega"];

/// Built-in plural -> singular mappings the suffix rules get wrong.
pub const DEFAULT_IRREGULAR_SINGULARS: &[(&str, &str)] = &[
    ("men", "man"),
    ("mens", "man"),
    ("women", "woman"),
    ("womens", "woman"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("people", "person"),
    ("humans", "human"),
    ("kids", "kid"),
    ("omegas", "omegas"),
    ("lbs", "lb"),
    ("iris", "iris"),
    ("homeplus", "homeplus"),
];

const THRESHOLD_KEY: &str = "stopword_threshold";

/// The `auto` section of the vocabulary file.
///
/// Kept as the raw JSON object so keys this crate does not know about, and
/// the exact number written for the threshold, survive a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoSettings(Map<String, Value>);

impl AutoSettings {
    /// Adds settings missing from a loaded section. Present keys are untouched.
    pub fn fill_defaults(&mut self) {
        self.0
            .entry(THRESHOLD_KEY)
            .or_insert_with(|| Value::from(DEFAULT_STOPWORD_THRESHOLD));
    }

    /// Minimum share of rows a short token must appear in before it is learned as a stopword.
    pub fn stopword_threshold(&self) -> f64 {
        self.0
            .get(THRESHOLD_KEY)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_STOPWORD_THRESHOLD)
    }

    /// Non-finite values are stored as `null` and rejected by validation.
    pub fn set_stopword_threshold(&mut self, threshold: f64) {
        self.0.insert(THRESHOLD_KEY.to_string(), Value::from(threshold));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn validate(&self) -> Result<()> {
        let Some(raw) = self.0.get(THRESHOLD_KEY) else {
            return Ok(());
        };
        match raw.as_f64() {
            Some(threshold) if (0.0..=1.0).contains(&threshold) => Ok(()),
            _ => Err(RootError::InvalidVocabulary(format!(
                "stopword_threshold must be a number within [0, 1], got {raw}"
            ))),
        }
    }
}

impl Default for AutoSettings {
    fn default() -> Self {
        let mut settings = Self(Map::new());
        settings.fill_defaults();
        settings
    }
}

/// The persisted, learnable overlay on top of the compiled-in defaults.
///
/// Field order is the on-disk key order. Sorted collections keep the file
/// sorted and free of duplicates without a separate normalization step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default)]
    pub auto: AutoSettings,
    #[serde(default)]
    pub irregular_singulars: BTreeMap<String, String>,
    #[serde(default)]
    pub stopwords: BTreeSet<String>,
}

/// The vocabulary in effect for one analysis: defaults merged with the overlay.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    pub stopwords: HashSet<String>,
    pub irregular_singulars: HashMap<String, String>,
    pub stopword_threshold: f64,
}

impl Vocabulary {
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }
}

impl VocabularyConfig {
    pub fn validate(&self) -> Result<()> {
        self.auto.validate()
    }

    /// Merges the overlay onto the defaults. Overlay irregulars replace a
    /// default mapping for the same plural; default stopwords cannot be removed.
    pub fn active(&self) -> Vocabulary {
        let mut stopwords: HashSet<String> = DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect();
        stopwords.extend(self.stopwords.iter().cloned());

        let mut irregular_singulars: HashMap<String, String> = DEFAULT_IRREGULAR_SINGULARS
            .iter()
            .map(|(plural, singular)| (plural.to_string(), singular.to_string()))
            .collect();
        irregular_singulars.extend(
            self.irregular_singulars
                .iter()
                .map(|(plural, singular)| (plural.clone(), singular.clone())),
        );

        Vocabulary {
            stopwords,
            irregular_singulars,
            stopword_threshold: self.auto.stopword_threshold(),
        }
    }

    /// Folds learned entries into the overlay. Existing irregular mappings are
    /// never overwritten. Returns whether anything changed.
    pub fn absorb(&mut self, updates: &VocabularyUpdates) -> bool {
        let mut changed = false;
        for word in &updates.new_stopwords {
            changed |= self.stopwords.insert(word.clone());
        }
        for (plural, singular) in &updates.new_irregular_singulars {
            if !self.irregular_singulars.contains_key(plural) {
                self.irregular_singulars.insert(plural.clone(), singular.clone());
                changed = true;
            }
        }
        changed
    }
}

/// Vocabulary entries discovered during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyUpdates {
    pub new_stopwords: BTreeSet<String>,
    pub new_irregular_singulars: BTreeMap<String, String>,
}

impl VocabularyUpdates {
    pub fn is_empty(&self) -> bool {
        self.new_stopwords.is_empty() && self.new_irregular_singulars.is_empty()
    }
}
