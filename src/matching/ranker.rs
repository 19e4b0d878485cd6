//! Candidate ranking
//!
//! Combines per-field similarity and equality signals into one weighted
//! score per catalog candidate and selects the best. Weights are named
//! constants; changing them is a behavior change, not a tuning knob.

use tracing::debug;

use crate::catalog::CardRecord;
use crate::extract::ExtractedFields;
use crate::matching::fuzzy;

/// Weight of name similarity against the candidate's canonical name
pub const NAME_WEIGHT: f64 = 0.50;
/// Weight of exact set-code equality (case-insensitive)
pub const SET_CODE_WEIGHT: f64 = 0.20;
/// Weight of exact collector-number equality
pub const COLLECTOR_WEIGHT: f64 = 0.15;
/// Weight of exact rarity equality (case-insensitive)
pub const RARITY_WEIGHT: f64 = 0.10;
/// Weight of artist name similarity
pub const ARTIST_WEIGHT: f64 = 0.05;

/// The selected candidate with its blended match quality
///
/// `match_quality` blends name similarity with raw recognition confidence
/// and is deliberately lower-resolution than the internal selection score.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Winning catalog candidate
    pub candidate: CardRecord,
    /// Blended confidence in [0.0, 1.0]
    pub match_quality: f64,
    /// Extracted fields that contributed to the score, with the candidate
    /// values they matched against
    pub matched_fields: Vec<(String, String)>,
}

/// Select the best candidate for the extracted fields
///
/// Returns `None` only when `candidates` is empty. Ties keep the candidate
/// that appears first in the input sequence; the input is never reordered.
/// `recognition_confidence` is the raw recognizer confidence (0-100).
pub fn select_best(
    candidates: &[CardRecord],
    fields: &ExtractedFields,
    recognition_confidence: f32,
) -> Option<MatchResult> {
    let mut best: Option<(f64, f64, MatchResult)> = None;

    for candidate in candidates {
        let (score, name_similarity, matched_fields) = score_candidate(candidate, fields);
        debug!(name = %candidate.name, score, "scored candidate");

        let is_better = match &best {
            Some((best_score, _, _)) => score > *best_score,
            None => true,
        };
        if is_better {
            let result = MatchResult {
                candidate: candidate.clone(),
                match_quality: 0.0,
                matched_fields,
            };
            best = Some((score, name_similarity, result));
        }
    }

    best.map(|(_, name_similarity, mut result)| {
        result.match_quality = blend_quality(
            fields.card_name.as_ref().map(|_| name_similarity),
            recognition_confidence,
        );
        result
    })
}

/// Weighted score for one candidate, accumulated independently per field
fn score_candidate(candidate: &CardRecord, fields: &ExtractedFields) -> (f64, f64, Vec<(String, String)>) {
    let mut score = 0.0;
    let mut name_similarity = 0.0;
    let mut matched = Vec::new();

    if let Some(name) = &fields.card_name {
        name_similarity = fuzzy::similarity(
            &name.value.to_lowercase(),
            &candidate.name.to_lowercase(),
        );
        score += name_similarity * NAME_WEIGHT;
        matched.push(("card_name".to_string(), candidate.name.clone()));
    }

    if let (Some(extracted), Some(actual)) = (&fields.set_code, &candidate.set) {
        if extracted.value.eq_ignore_ascii_case(actual) {
            score += SET_CODE_WEIGHT;
            matched.push(("set_code".to_string(), actual.clone()));
        }
    }

    if let (Some(extracted), Some(actual)) = (&fields.collector_number, &candidate.collector_number)
    {
        if extracted.value == *actual {
            score += COLLECTOR_WEIGHT;
            matched.push(("collector_number".to_string(), actual.clone()));
        }
    }

    if let (Some(extracted), Some(actual)) = (&fields.rarity, &candidate.rarity) {
        if extracted.value.eq_ignore_ascii_case(actual) {
            score += RARITY_WEIGHT;
            matched.push(("rarity".to_string(), actual.clone()));
        }
    }

    if let (Some(extracted), Some(actual)) = (&fields.artist, &candidate.artist) {
        score += fuzzy::similarity(&extracted.value.to_lowercase(), &actual.to_lowercase())
            * ARTIST_WEIGHT;
        matched.push(("artist".to_string(), actual.clone()));
    }

    (score, name_similarity, matched)
}

/// Mean of name similarity (when a name was extracted) and recognition
/// confidence rescaled to [0.0, 1.0]
fn blend_quality(name_similarity: Option<f64>, recognition_confidence: f32) -> f64 {
    let recognition = f64::from(recognition_confidence) / 100.0;
    match name_similarity {
        Some(name) => (name + recognition) / 2.0,
        None => recognition,
    }
    .clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FieldExtractor;

    fn candidate(name: &str) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn fields_for(text: &str) -> ExtractedFields {
        FieldExtractor::new().extract(text)
    }

    #[test]
    fn test_perfect_name_match_wins() {
        let candidates = vec![candidate("Black Lotus"), candidate("Blacker Lotus")];
        let fields = fields_for("Black Lotus");

        let result = select_best(&candidates, &fields, 100.0).unwrap();
        assert_eq!(result.candidate.name, "Black Lotus");
        // Perfect name similarity blended with full recognition confidence
        assert!((result.match_quality - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        // Identical names score identically; first-seen order must win
        let a = CardRecord {
            id: "first".to_string(),
            ..candidate("Shock")
        };
        let b = CardRecord {
            id: "second".to_string(),
            ..candidate("Shock")
        };
        let fields = fields_for("Shock");
        let result = select_best(&[a, b], &fields, 50.0).unwrap();
        assert_eq!(result.candidate.id, "first");

        // Same property with no extracted fields at all: every score is 0.0
        let fields = fields_for("");
        let a = CardRecord {
            id: "first".to_string(),
            ..candidate("Alpha")
        };
        let b = CardRecord {
            id: "second".to_string(),
            ..candidate("Beta")
        };
        let result = select_best(&[a, b], &fields, 50.0).unwrap();
        assert_eq!(result.candidate.id, "first");
    }

    #[test]
    fn test_set_code_breaks_name_tie() {
        let mut with_set = candidate("Shock");
        with_set.set = Some("m21".to_string());
        let mut other_set = candidate("Shock");
        other_set.set = Some("m20".to_string());

        let fields = fields_for("Shock\nInstant\n[M21]");
        // Later candidate scores strictly higher through the set-code term
        let result = select_best(&[other_set, with_set], &fields, 80.0).unwrap();
        assert_eq!(result.candidate.set.as_deref(), Some("m21"));
    }

    #[test]
    fn test_empty_candidates() {
        let fields = fields_for("Shock");
        assert!(select_best(&[], &fields, 80.0).is_none());
    }

    #[test]
    fn test_quality_without_name_uses_recognition_only() {
        let fields = fields_for("");
        let result = select_best(&[candidate("Shock")], &fields, 60.0).unwrap();
        assert!((result.match_quality - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_quality_blend_is_mean() {
        let candidates = vec![candidate("Black Lotus")];
        let fields = fields_for("Black Lotus");
        let result = select_best(&candidates, &fields, 80.0).unwrap();
        // (1.0 + 0.8) / 2
        assert!((result.match_quality - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_matched_fields_reported() {
        let mut card = candidate("Black Lotus");
        card.set = Some("lea".to_string());
        let fields = fields_for("Black Lotus\n[LEA]");
        let result = select_best(&[card], &fields, 90.0).unwrap();

        let field_names: Vec<&str> = result
            .matched_fields
            .iter()
            .map(|(f, _)| f.as_str())
            .collect();
        assert!(field_names.contains(&"card_name"));
        assert!(field_names.contains(&"set_code"));
    }
}
