pub mod aggregator;
pub mod engine;
pub mod redundancy;
pub mod tokenizer;
pub mod types;
