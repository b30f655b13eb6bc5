// src/core/types.rs
use crate::error::{RootError, BAD_MODE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a root in first-seen order. Doubles as the stable tie-break.
pub type RootId = usize;

/// One (keyword, search volume) pair from a keyword-research export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRow {
    pub keyword: String,
    pub search_volume: u64,
}

impl KeywordRow {
    pub fn new(keyword: impl Into<String>, search_volume: u64) -> Self {
        Self { keyword: keyword.into(), search_volume }
    }
}

/// A keyword row that contributed to a root.
pub type Member = KeywordRow;

/// Tokens of a single keyword, before and after plural folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    pub normalized: Vec<String>,
    /// Case-folded and punctuation-stripped, not yet singularized.
    pub raw: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Every contiguous sub-phrase is a candidate root, followed by redundancy elimination.
    Full,
    /// The whole filtered phrase is the only candidate.
    Simple,
}

impl FromStr for Mode {
    type Err = RootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Mode::Full),
            "simple" => Ok(Mode::Simple),
            _ => Err(RootError::InvalidInput(BAD_MODE)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Full => f.write_str("full"),
            Mode::Simple => f.write_str("simple"),
        }
    }
}

/// A surviving root phrase with its aggregated statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Root {
    pub normalized_term: String,
    pub frequency: u64,
    pub search_volume: u64,
    /// `search_volume` over the largest surviving volume. Full mode only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_volume: Option<f64>,
    pub members: Vec<Member>,
}
