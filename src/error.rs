//! Error types for the identification pipeline
//!
//! Only collaborator-boundary failures surface as errors. Extraction and
//! scoring degrade to empty or low-confidence output instead of failing,
//! so callers should inspect `match_quality` and `Disambiguation::has_matches`
//! rather than relying on error signaling alone.

use thiserror::Error;

/// Failures crossing the catalog collaborator boundary
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog has no entry for the requested name or identifier
    #[error("card not found in catalog")]
    NotFound,
    /// The catalog rejected the request for exceeding its rate limit
    #[error("catalog rate limit exceeded")]
    RateLimited,
    /// Transport-level failure; not retried by this crate
    #[error("catalog request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Failures of the end-to-end identification pipeline
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// Recognized text was empty or contained no usable card name
    #[error("no usable card name in recognized text")]
    NoTextExtracted,
    /// Catalog search returned zero results, including after the fuzzy fallback
    #[error("catalog search returned no candidates")]
    NoCandidatesFound,
    /// A catalog boundary failure, propagated unchanged
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failures of the external text-recognition collaborator
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// The recognition engine could not produce text for the image
    #[error("text recognition failed: {0}")]
    RecognitionFailed(String),
}
