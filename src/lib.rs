// src/lib.rs

pub mod core;
pub mod error;
pub mod keyword_csv;
pub mod learning;
pub mod persistence;
pub mod vocabulary;

pub use crate::core::engine::{analyze, AnalysisReport, RootEngine};
pub use crate::core::types::{KeywordRow, Member, Mode, Root};
pub use crate::error::{Result, RootError};
pub use crate::vocabulary::{VocabularyConfig, VocabularyUpdates};
