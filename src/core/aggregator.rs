// --- File: src/core/aggregator.rs
use crate::core::types::{KeywordRow, Member, Mode, RootId, TokenSequence};
use crate::vocabulary::Vocabulary;
use std::collections::{HashMap, HashSet};

/// Aggregated statistics for one candidate root.
#[derive(Debug, Clone)]
pub struct RootEntry {
    pub term: String,
    pub tokens: Vec<String>,
    /// Rows containing the root, counted once per row.
    pub frequency: u64,
    pub search_volume: u64,
    pub members: Vec<Member>,
}

/// All candidate roots of one pass, stored in first-seen order.
///
/// The position in `entries` is the root's `RootId` and its first-seen rank.
#[derive(Debug, Default)]
pub struct RootStats {
    pub entries: Vec<RootEntry>,
    index: HashMap<String, RootId>,
}

impl RootStats {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, term: &str) -> Option<&RootEntry> {
        self.index.get(term).map(|&id| &self.entries[id])
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Gets or creates the entry for a root, returning its ID.
    fn get_or_create(&mut self, tokens: &[&str]) -> RootId {
        let term = tokens.join(" ");
        if let Some(&id) = self.index.get(&term) {
            return id;
        }
        let id = self.entries.len();
        self.entries.push(RootEntry {
            term: term.clone(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            frequency: 0,
            search_volume: 0,
            members: Vec::new(),
        });
        self.index.insert(term, id);
        id
    }

    /// Volumes saturate at `u64::MAX` instead of wrapping.
    fn record(&mut self, id: RootId, row: &KeywordRow) {
        let entry = &mut self.entries[id];
        entry.frequency += 1;
        entry.search_volume = entry.search_volume.saturating_add(row.search_volume);
        entry.members.push(row.clone());
    }
}

/// Builds candidate roots for every row in a single pass.
///
/// Full mode: every contiguous sub-phrase of the stopword-filtered tokens,
/// L·(L+1)/2 candidates per row, each counted once per row.
/// Simple mode: the whole filtered phrase.
pub fn aggregate(
    rows: &[KeywordRow],
    tokens: &[TokenSequence],
    vocabulary: &Vocabulary,
    mode: Mode,
) -> RootStats {
    let mut stats = RootStats::default();

    for (row, sequence) in rows.iter().zip(tokens) {
        let filtered: Vec<&str> = sequence
            .normalized
            .iter()
            .map(String::as_str)
            .filter(|token| !vocabulary.is_stopword(token))
            .collect();
        if filtered.is_empty() {
            continue;
        }

        match mode {
            Mode::Full => {
                let mut seen_in_row: HashSet<RootId> = HashSet::new();
                for start in 0..filtered.len() {
                    for end in start + 1..=filtered.len() {
                        let id = stats.get_or_create(&filtered[start..end]);
                        if seen_in_row.insert(id) {
                            stats.record(id, row);
                        }
                    }
                }
            }
            Mode::Simple => {
                let id = stats.get_or_create(&filtered);
                stats.record(id, row);
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tokenizer::TokenizedCorpus;
    use crate::vocabulary::VocabularyConfig;

    fn run(rows: &[KeywordRow], mode: Mode) -> RootStats {
        let vocab = VocabularyConfig::default().active();
        let corpus = TokenizedCorpus::build(rows, &vocab.irregular_singulars);
        aggregate(rows, &corpus.rows, &vocab, mode)
    }

    #[test]
    fn test_full_mode_enumerates_contiguous_subphrases() {
        let rows = vec![KeywordRow::new("red wool socks", 40)];
        let stats = run(&rows, Mode::Full);
        let terms: Vec<&str> = stats.entries.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(
            terms,
            vec!["red", "red wool", "red wool sock", "wool", "wool sock", "sock"]
        );
        assert!(stats.entries.iter().all(|e| e.frequency == 1 && e.search_volume == 40));
    }

    #[test]
    fn test_repeats_within_a_row_count_once() {
        let rows = vec![KeywordRow::new("tea tea tea", 7), KeywordRow::new("green tea", 3)];
        let stats = run(&rows, Mode::Full);
        let tea = stats.find("tea").unwrap();
        assert_eq!(tea.frequency, 2);
        assert_eq!(tea.search_volume, 10);
        assert_eq!(tea.members.len(), 2);
        assert_eq!(stats.find("tea tea").unwrap().frequency, 1);
    }

    #[test]
    fn test_stopwords_are_removed_before_enumeration() {
        let rows = vec![KeywordRow::new("the", 5), KeywordRow::new("case for phone", 9)];
        let stats = run(&rows, Mode::Full);
        assert!(!stats.contains("the"));
        assert!(!stats.contains("for"));
        // stopword removal makes "case" and "phone" adjacent
        assert!(stats.contains("case phone"));
    }

    #[test]
    fn test_simple_mode_uses_whole_phrase() {
        let rows = vec![
            KeywordRow::new("Dog Toys", 10),
            KeywordRow::new("dog toy", 5),
            KeywordRow::new("toys for dogs", 1),
            KeywordRow::new("for the", 8),
        ];
        let stats = run(&rows, Mode::Simple);
        let terms: Vec<&str> = stats.entries.iter().map(|e| e.term.as_str()).collect();
        assert_eq!(terms, vec!["dog toy", "toy dog"]);
        let dog_toy = stats.find("dog toy").unwrap();
        assert_eq!(dog_toy.frequency, 2);
        assert_eq!(dog_toy.search_volume, 15);
        assert_eq!(dog_toy.members[0].keyword, "Dog Toys");
    }

    #[test]
    fn test_volume_sum_saturates() {
        let rows = vec![
            KeywordRow::new("lamp", u64::MAX),
            KeywordRow::new("lamp", 1),
            KeywordRow::new("desk lamp", u64::MAX),
        ];
        let stats = run(&rows, Mode::Full);
        let lamp = stats.find("lamp").unwrap();
        assert_eq!(lamp.frequency, 3);
        assert_eq!(lamp.search_volume, u64::MAX);
        assert_eq!(stats.find("desk").unwrap().search_volume, u64::MAX);

        let stats = run(&rows[..2], Mode::Simple);
        assert_eq!(stats.find("lamp").unwrap().search_volume, u64::MAX);
    }
}
