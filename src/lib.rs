//! cardlens - trading card identification from noisy OCR text
//!
//! Turns low-confidence recognized text from a photographed trading card
//! into a ranked identification of a catalog entry and, further, of a
//! specific printing. Extraction and scoring are pure and synchronous;
//! only catalog lookups cross an async boundary, rate-limited and memoized
//! behind a TTL cache.
//!
//! Camera capture, image preprocessing, the vision engine itself, and all
//! presentation concerns live outside this crate; they plug in through the
//! [`recognition::RecognitionEngine`] and [`catalog::CatalogClient`]
//! boundaries.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod editions;
pub mod error;
pub mod extract;
pub mod identify;
pub mod matching;
pub mod recognition;

pub use cache::TtlCache;
pub use catalog::{CardRecord, CatalogClient, EditionRecord, Prices, ScryfallClient};
pub use config::{load_config, save_config, ScanConfig};
pub use editions::{
    price_range, Disambiguation, EditionHints, EditionMatch, EditionResolver, PriceRange,
    RankedEdition,
};
pub use error::{CatalogError, IdentifyError, RecognitionError};
pub use extract::{ExtractedFields, FieldExtractor, FieldGuess};
pub use identify::{CardIdentifier, Identification};
pub use matching::{similarity, MatchResult};
pub use recognition::{RawRecognition, RecognitionEngine, WordConfidence};
