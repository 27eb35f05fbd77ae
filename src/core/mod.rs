// src/core/mod.rs
pub mod dictionary;
pub mod engine;
pub mod group;
pub mod ranker;
pub mod similarity;
pub mod tokenizer;
pub mod types;
pub mod vectorizer;
