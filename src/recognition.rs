//! Recognition collaborator boundary
//!
//! The vision engine, frame capture, and pixel-level preprocessing live
//! outside this crate. This module defines the text payload they hand over
//! and the abstract contract they implement.

use crate::error::RecognitionError;

/// A single recognized word with its recognition confidence
#[derive(Debug, Clone)]
pub struct WordConfidence {
    /// Recognized word
    pub word: String,
    /// Recognition confidence (0-100)
    pub confidence: f32,
}

/// Raw output of the external text-recognition collaborator
///
/// Immutable once received; the pipeline only reads from it.
#[derive(Debug, Clone)]
pub struct RawRecognition {
    /// Full recognized text, line breaks preserved
    pub text: String,
    /// Per-word confidences in recognition order
    pub word_confidences: Vec<WordConfidence>,
}

impl RawRecognition {
    /// Create a recognition result from text and per-word confidences
    pub fn new(text: impl Into<String>, word_confidences: Vec<WordConfidence>) -> Self {
        Self {
            text: text.into(),
            word_confidences,
        }
    }

    /// Create a recognition result from bare text (no word confidences)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// Mean word confidence (0-100), 0 when no word confidences were reported
    pub fn overall_confidence(&self) -> f32 {
        if self.word_confidences.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.word_confidences.iter().map(|w| w.confidence).sum();
        sum / self.word_confidences.len() as f32
    }
}

/// Contract for the external recognition engine
///
/// Implementations wrap a concrete OCR backend and are responsible for their
/// own preprocessing (contrast, exposure); none of that is portable and none
/// of it lives here.
pub trait RecognitionEngine {
    /// Run text recognition on a raw image buffer
    fn recognize(
        &self,
        image_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<RawRecognition, RecognitionError>;
}
