// --- File: src/core/redundancy.rs
use crate::core::aggregator::{RootEntry, RootStats};
use crate::core::types::RootId;
use std::cmp::Reverse;
use std::collections::BTreeMap;

fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn dominates(longer: &RootEntry, shorter: &RootEntry) -> bool {
    longer.frequency == shorter.frequency
        && longer.search_volume == shorter.search_volume
        && contains_phrase(&longer.tokens, &shorter.tokens)
}

/// Removes roots that never occur apart from a longer root containing them.
///
/// Multi-word roots seen in a single row are dropped first. Lengths are then
/// processed shortest first; a root is discarded as soon as any surviving
/// longer root contains it with identical frequency and search volume.
/// Only roots of the current length are discarded in a pass, so every longer
/// root is still present when it is consulted and the outcome does not depend
/// on which dominating root is found first.
///
/// Returns survivors ordered by frequency desc, search volume desc, first seen asc.
pub fn eliminate_redundant(stats: &RootStats) -> Vec<RootId> {
    let entries = &stats.entries;
    let mut keep: Vec<bool> = entries
        .iter()
        .map(|e| !(e.tokens.len() > 1 && e.frequency == 1))
        .collect();

    let mut by_length: BTreeMap<usize, Vec<RootId>> = BTreeMap::new();
    for (id, entry) in entries.iter().enumerate() {
        if keep[id] {
            by_length.entry(entry.tokens.len()).or_default().push(id);
        }
    }
    let max_length = by_length.keys().next_back().copied().unwrap_or(0);

    for length in 1..max_length {
        let Some(ids) = by_length.get(&length) else { continue };
        for &id in ids {
            let dominated = by_length
                .range(length + 1..)
                .flat_map(|(_, longer)| longer.iter())
                .any(|&other| keep[other] && dominates(&entries[other], &entries[id]));
            if dominated {
                keep[id] = false;
            }
        }
    }

    let mut survivors: Vec<RootId> = (0..entries.len()).filter(|&id| keep[id]).collect();
    survivors.sort_by_key(|&id| (Reverse(entries[id].frequency), Reverse(entries[id].search_volume), id));
    survivors
}

/// Simple-mode order: search volume desc, first seen asc.
pub fn order_by_volume(stats: &RootStats) -> Vec<RootId> {
    let mut ids: Vec<RootId> = (0..stats.len()).collect();
    ids.sort_by_key(|&id| (Reverse(stats.entries[id].search_volume), id));
    ids
}
