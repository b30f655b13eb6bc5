use crate::core::aggregator::aggregate;
use crate::core::redundancy::{eliminate_redundant, order_by_volume};
use crate::core::tokenizer::TokenizedCorpus;
use crate::core::types::{KeywordRow, Mode, Root};
use crate::error::{Result, RootError, NO_ROWS, NO_TERMS};
use crate::learning::VocabularyLearner;
use crate::persistence::{load_or_default, save_to_disk};
use crate::vocabulary::{VocabularyConfig, VocabularyUpdates};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of one analysis, shaped like the JSON response of the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub mode: Mode,
    pub total_keywords: usize,
    pub results: Vec<Root>,
    pub auto_config_updates: VocabularyUpdates,
}

/// Runs tokenization, aggregation, redundancy elimination (full mode) and
/// vocabulary learning over `rows` using `config` merged with the defaults.
///
/// `config` is not modified. Learned entries are reported in
/// `auto_config_updates` for the caller to absorb and persist.
pub fn analyze(rows: &[KeywordRow], mode: Mode, config: &VocabularyConfig) -> Result<AnalysisReport> {
    if rows.is_empty() {
        return Err(RootError::InvalidInput(NO_ROWS));
    }
    debug!("Root analysis started - rows={}, mode={}", rows.len(), mode);

    let vocabulary = config.active();
    let corpus = TokenizedCorpus::build(rows, &vocabulary.irregular_singulars);
    let stats = aggregate(rows, &corpus.rows, &vocabulary, mode);

    let ordered = match mode {
        Mode::Full => eliminate_redundant(&stats),
        Mode::Simple => order_by_volume(&stats),
    };
    if ordered.is_empty() {
        return Err(RootError::InvalidInput(NO_TERMS));
    }
    info!(
        "Roots aggregated - mode={}, candidates={}, surviving={}",
        mode,
        stats.len(),
        ordered.len()
    );

    let max_volume = ordered
        .iter()
        .map(|&id| stats.entries[id].search_volume)
        .max()
        .unwrap_or(0);

    let results = ordered
        .iter()
        .map(|&id| {
            let entry = &stats.entries[id];
            let relative_volume = match mode {
                Mode::Full if max_volume > 0 => Some(entry.search_volume as f64 / max_volume as f64),
                Mode::Full => Some(0.0),
                Mode::Simple => None,
            };
            Root {
                normalized_term: entry.term.clone(),
                frequency: entry.frequency,
                search_volume: entry.search_volume,
                relative_volume,
                members: entry.members.clone(),
            }
        })
        .collect();

    let updates = VocabularyLearner::new().learn(&corpus, &vocabulary, &stats);
    if !updates.new_stopwords.is_empty() {
        let words: Vec<&str> = updates.new_stopwords.iter().map(String::as_str).collect();
        info!("[auto-config] added stopwords: {}", words.join(", "));
    }
    if !updates.new_irregular_singulars.is_empty() {
        let pairs: Vec<String> = updates
            .new_irregular_singulars
            .iter()
            .map(|(plural, singular)| format!("{plural}->{singular}"))
            .collect();
        info!("[auto-config] added irregulars: {}", pairs.join(", "));
    }

    Ok(AnalysisReport {
        mode,
        total_keywords: rows.len(),
        results,
        auto_config_updates: updates,
    })
}

/// Holds the vocabulary overlay between runs and where it is persisted.
pub struct RootEngine {
    pub vocabulary: VocabularyConfig,
    vocabulary_path: Option<PathBuf>,
}

impl RootEngine {
    pub fn new(vocabulary: VocabularyConfig) -> Self {
        Self { vocabulary, vocabulary_path: None }
    }

    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let vocabulary = load_or_default(path)?;
        Ok(Self { vocabulary, vocabulary_path: Some(path.to_path_buf()) })
    }

    pub fn analyze(&self, rows: &[KeywordRow], mode: Mode) -> Result<AnalysisReport> {
        analyze(rows, mode, &self.vocabulary)
    }

    pub fn absorb(&mut self, updates: &VocabularyUpdates) -> bool {
        self.vocabulary.absorb(updates)
    }

    pub fn save_vocabulary(&self) -> Result<()> {
        if let Some(path) = &self.vocabulary_path {
            save_to_disk(&self.vocabulary, path)
        } else {
            Ok(()) // Don't error if no path is set
        }
    }

    /// Analyzes, then folds in and saves whatever was learned.
    /// The file is only rewritten when the overlay actually changed.
    pub fn run(&mut self, rows: &[KeywordRow], mode: Mode) -> Result<AnalysisReport> {
        let report = self.analyze(rows, mode)?;
        if self.absorb(&report.auto_config_updates) {
            self.save_vocabulary()?;
        }
        Ok(report)
    }
}

impl Default for RootEngine {
    fn default() -> Self {
        Self::new(VocabularyConfig::default())
    }
}
