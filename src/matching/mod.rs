//! Fuzzy matching and candidate ranking

pub mod fuzzy;
pub mod ranker;

pub use fuzzy::similarity;
pub use ranker::{select_best, MatchResult};
