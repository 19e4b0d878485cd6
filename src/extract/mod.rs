//! Field extraction from recognized card text
//!
//! Turns raw OCR output into structured per-field guesses. Each field has an
//! ordered cascade of patterns, most specific first; the first pattern that
//! produces a non-empty match wins and later tiers exist for degraded input.
//! Extraction never fails: absence of a field is a normal outcome.

use regex::Regex;
use tracing::debug;

/// A guessed field value with its extraction confidence (0.0-1.0)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGuess<T> {
    /// Extracted value
    pub value: T,
    /// Heuristic confidence: pattern specificity and value-length
    /// plausibility; fallback tiers score lower than primaries
    pub confidence: f32,
}

impl<T> FieldGuess<T> {
    fn new(value: T, confidence: f32) -> Self {
        Self { value, confidence }
    }
}

/// Structured field guesses extracted from one recognition result
///
/// A field's value and its confidence always travel together, so no field
/// can have one without the other.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    /// Card name from the start of the text
    pub card_name: Option<FieldGuess<String>>,
    /// Mana cost symbol tokens, order preserved
    pub mana_cost: Option<FieldGuess<Vec<String>>>,
    /// Creature power (digits, `*`, or `X`)
    pub power: Option<FieldGuess<String>>,
    /// Creature toughness (digits, `*`, or `X`)
    pub toughness: Option<FieldGuess<String>>,
    /// Three-to-four character set code
    pub set_code: Option<FieldGuess<String>>,
    /// Collector number
    pub collector_number: Option<FieldGuess<String>>,
    /// Rarity word from the fixed vocabulary
    pub rarity: Option<FieldGuess<String>>,
    /// Full type line
    pub type_line: Option<FieldGuess<String>>,
    /// Artist credit
    pub artist: Option<FieldGuess<String>>,
    /// Copyright year
    pub copyright_year: Option<FieldGuess<i32>>,
    /// Card name with noise characters stripped, whitespace collapsed, and
    /// stop words removed
    pub cleaned_card_name: Option<String>,
}

impl ExtractedFields {
    /// Arithmetic mean of all assigned per-field confidences, 0.0 when no
    /// field was extracted
    pub fn aggregate_confidence(&self) -> f32 {
        let confidences = self.field_confidences();
        if confidences.is_empty() {
            return 0.0;
        }
        confidences.iter().sum::<f32>() / confidences.len() as f32
    }

    /// Whether any field at all was extracted
    pub fn is_empty(&self) -> bool {
        self.field_confidences().is_empty()
    }

    fn field_confidences(&self) -> Vec<f32> {
        let mut out = Vec::new();
        if let Some(f) = &self.card_name {
            out.push(f.confidence);
        }
        if let Some(f) = &self.mana_cost {
            out.push(f.confidence);
        }
        if let Some(f) = &self.power {
            out.push(f.confidence);
        }
        if let Some(f) = &self.toughness {
            out.push(f.confidence);
        }
        if let Some(f) = &self.set_code {
            out.push(f.confidence);
        }
        if let Some(f) = &self.collector_number {
            out.push(f.confidence);
        }
        if let Some(f) = &self.rarity {
            out.push(f.confidence);
        }
        if let Some(f) = &self.type_line {
            out.push(f.confidence);
        }
        if let Some(f) = &self.artist {
            out.push(f.confidence);
        }
        if let Some(f) = &self.copyright_year {
            out.push(f.confidence);
        }
        out
    }
}

/// Confidence for a match from a primary pattern with a plausible value
const CONFIDENCE_PRIMARY: f32 = 0.9;
/// Confidence for a primary match with an implausible value length
const CONFIDENCE_DEMOTED: f32 = 0.65;
/// Confidence for a match from a fallback pattern
const CONFIDENCE_FALLBACK: f32 = 0.6;
/// Confidence for vocabulary lookups (small fixed word lists)
const CONFIDENCE_VOCABULARY: f32 = 0.7;

/// Stop words removed from the cleaned card name
const STOP_WORDS: [&str; 4] = ["the", "of", "a", "an"];

/// One pattern in a per-field cascade
struct PatternTier {
    regex: Regex,
    confidence: f32,
}

impl PatternTier {
    fn new(pattern: &str, confidence: f32) -> Self {
        Self {
            regex: compile(pattern),
            confidence,
        }
    }
}

fn compile(pattern: &str) -> Regex {
    // All patterns are compile-time literals checked by the test suite
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid field pattern {pattern:?}: {e}"))
}

/// Extracts structured field guesses from recognized card text
pub struct FieldExtractor {
    name_tiers: Vec<PatternTier>,
    mana_symbol: Regex,
    power_toughness: Regex,
    set_code_tiers: Vec<PatternTier>,
    collector_tiers: Vec<PatternTier>,
    rarity: Regex,
    type_line: Regex,
    artist: Regex,
    year_tiers: Vec<PatternTier>,
}

impl FieldExtractor {
    /// Create an extractor with all field patterns compiled
    pub fn new() -> Self {
        Self {
            name_tiers: vec![
                // Capitalized run at the start of the first line, terminated
                // by a mana-cost marker, a digit run, a spaced dash, or EOL.
                // 0 and 1 stay in the run so the name repair can fix them.
                PatternTier::new(
                    r"^\s*([A-Z][A-Za-z01',\-\. ]*?)(?:\s*\{|\s+\d|\s+[-–—]\s|\s*$)",
                    CONFIDENCE_PRIMARY,
                ),
                // Degraded input: any leading letter run
                PatternTier::new(r"^\s*([A-Za-z][A-Za-z' \-]{2,39})", CONFIDENCE_FALLBACK),
            ],
            mana_symbol: compile(r"\{([^{}]+)\}"),
            power_toughness: compile(
                r"(?:^|[^0-9])([0-9]{1,2}|[Xx*])\s*/\s*([0-9]{1,2}|[Xx*])(?:[^0-9]|$)",
            ),
            set_code_tiers: vec![
                // Bracketed 3-4 character alphanumeric code
                PatternTier::new(r"[\[(]([A-Za-z][A-Za-z0-9]{2,3})[\])]", CONFIDENCE_PRIMARY),
                // Copyright-adjacent 3-4 letter run
                PatternTier::new(r"(?:©|\(c\)|\(C\))[^\n]{0,40}?\b([A-Z]{3,4})\b", CONFIDENCE_FALLBACK),
            ],
            collector_tiers: vec![
                // n/total fraction; totals are 2-4 digits, which keeps plain
                // power/toughness fractions like 3/4 out of this field
                PatternTier::new(r"\b(\d{1,4})\s*/\s*\d{2,4}\b", CONFIDENCE_PRIMARY),
                PatternTier::new(r"#\s*(\d{1,4})\b", CONFIDENCE_FALLBACK),
            ],
            rarity: compile(r"(?i)\b(mythic|rare|uncommon|common)\b"),
            type_line: compile(
                r"(?m)^(.*\b(?i:Legendary|Creature|Planeswalker|Instant|Sorcery|Artifact|Enchantment|Land|Battle)\b.*)$",
            ),
            artist: compile(
                r"(?:(?i:illus\.?(?:trated)?(?:\s+by)?|artist))\s*[:.]?\s*([A-Z][A-Za-z.'\-]*(?:\s[A-Z][A-Za-z.'\-]*)*)",
            ),
            year_tiers: vec![
                PatternTier::new(
                    r"(?:©|\(c\)|\(C\)|(?i:copyright))[^\n]{0,40}?\b((?:19|20)\d{2})\b",
                    CONFIDENCE_PRIMARY,
                ),
                PatternTier::new(r"\b((?:19|20)\d{2})\b", CONFIDENCE_FALLBACK),
            ],
        }
    }

    /// Extract all recognizable fields from the text
    pub fn extract(&self, text: &str) -> ExtractedFields {
        let mut fields = ExtractedFields::default();
        if text.trim().is_empty() {
            return fields;
        }

        fields.card_name = self.extract_card_name(text);
        fields.mana_cost = self.extract_mana_cost(text);
        (fields.power, fields.toughness) = self.extract_power_toughness(text);
        fields.set_code = self
            .first_match(&self.set_code_tiers, text)
            .map(|(value, confidence)| FieldGuess::new(value.to_uppercase(), confidence));
        fields.collector_number = self
            .first_match(&self.collector_tiers, text)
            .map(|(value, confidence)| FieldGuess::new(value, confidence));
        fields.rarity = self.extract_rarity(text);
        fields.type_line = self.extract_type_line(text);
        fields.artist = self.extract_artist(text);
        fields.copyright_year = self.extract_copyright_year(text);

        fields.cleaned_card_name = fields
            .card_name
            .as_ref()
            .map(|name| clean_name(&name.value))
            .filter(|cleaned| !cleaned.is_empty());

        debug!(
            aggregate = fields.aggregate_confidence(),
            name = fields.card_name.as_ref().map(|f| f.value.as_str()),
            "extracted fields"
        );
        fields
    }

    fn extract_card_name(&self, text: &str) -> Option<FieldGuess<String>> {
        let first_line = text.lines().next()?;
        for tier in &self.name_tiers {
            if let Some(caps) = tier.regex.captures(first_line) {
                let raw = caps.get(1)?.as_str().trim_matches([' ', ',', '.']);
                if raw.is_empty() {
                    continue;
                }
                let value = repair_name(raw);
                let confidence = if tier.confidence >= CONFIDENCE_PRIMARY
                    && !(3..=30).contains(&value.chars().count())
                {
                    CONFIDENCE_DEMOTED
                } else {
                    tier.confidence
                };
                return Some(FieldGuess::new(value, confidence));
            }
        }
        None
    }

    fn extract_mana_cost(&self, text: &str) -> Option<FieldGuess<Vec<String>>> {
        let symbols: Vec<String> = self
            .mana_symbol
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
            .collect();
        if symbols.is_empty() {
            None
        } else {
            Some(FieldGuess::new(symbols, CONFIDENCE_PRIMARY))
        }
    }

    fn extract_power_toughness(
        &self,
        text: &str,
    ) -> (Option<FieldGuess<String>>, Option<FieldGuess<String>>) {
        match self.power_toughness.captures(text) {
            Some(caps) => {
                let power = caps.get(1).map(|m| m.as_str().to_string());
                let toughness = caps.get(2).map(|m| m.as_str().to_string());
                (
                    power.map(|p| FieldGuess::new(p, CONFIDENCE_PRIMARY)),
                    toughness.map(|t| FieldGuess::new(t, CONFIDENCE_PRIMARY)),
                )
            }
            None => (None, None),
        }
    }

    fn extract_rarity(&self, text: &str) -> Option<FieldGuess<String>> {
        self.rarity.captures(text).and_then(|caps| {
            caps.get(1)
                .map(|m| FieldGuess::new(m.as_str().to_lowercase(), CONFIDENCE_VOCABULARY))
        })
    }

    fn extract_type_line(&self, text: &str) -> Option<FieldGuess<String>> {
        self.type_line.captures(text).and_then(|caps| {
            caps.get(1)
                .map(|m| FieldGuess::new(m.as_str().trim().to_string(), CONFIDENCE_VOCABULARY))
        })
    }

    fn extract_artist(&self, text: &str) -> Option<FieldGuess<String>> {
        self.artist.captures(text).and_then(|caps| {
            caps.get(1).map(|m| {
                let value = m.as_str().trim().to_string();
                let confidence = if (4..=40).contains(&value.chars().count()) {
                    CONFIDENCE_PRIMARY
                } else {
                    CONFIDENCE_FALLBACK
                };
                FieldGuess::new(value, confidence)
            })
        })
    }

    fn extract_copyright_year(&self, text: &str) -> Option<FieldGuess<i32>> {
        for tier in &self.year_tiers {
            if let Some(caps) = tier.regex.captures(text) {
                if let Some(year) = caps.get(1).and_then(|m| m.as_str().parse::<i32>().ok()) {
                    return Some(FieldGuess::new(year, tier.confidence));
                }
            }
        }
        None
    }

    fn first_match(&self, tiers: &[PatternTier], text: &str) -> Option<(String, f32)> {
        for tier in tiers {
            if let Some(caps) = tier.regex.captures(text) {
                if let Some(m) = caps.get(1) {
                    if !m.as_str().is_empty() {
                        return Some((m.as_str().to_string(), tier.confidence));
                    }
                }
            }
        }
        None
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Repair common digit-for-letter OCR confusions inside a name token
///
/// Only digits sandwiched between letters are rewritten (`0` to `o`, `1` to
/// `l`), so numeric fields elsewhere in the text are never touched.
fn repair_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len());
    for (i, &c) in chars.iter().enumerate() {
        let prev_letter = i > 0 && chars[i - 1].is_alphabetic();
        let next_letter = i + 1 < chars.len() && chars[i + 1].is_alphabetic();
        let repaired = match c {
            '0' if prev_letter && next_letter => 'o',
            '1' if prev_letter && next_letter => 'l',
            other => other,
        };
        out.push(repaired);
    }
    out
}

/// Strip noise characters, collapse whitespace, and remove stop words
fn clean_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '\'' || *c == '-' || c.is_whitespace())
        .collect();
    stripped
        .split_whitespace()
        .filter(|word| !STOP_WORDS.contains(&word.to_lowercase().as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FieldExtractor {
        FieldExtractor::new()
    }

    #[test]
    fn test_empty_text_yields_no_fields() {
        let fields = extractor().extract("");
        assert!(fields.is_empty());
        assert_eq!(fields.aggregate_confidence(), 0.0);
        assert!(fields.cleaned_card_name.is_none());
    }

    #[test]
    fn test_name_and_mana_cost() {
        let fields = extractor().extract("Lightning Bolt {R}");
        assert_eq!(fields.card_name.as_ref().unwrap().value, "Lightning Bolt");
        assert_eq!(fields.mana_cost.as_ref().unwrap().value, vec!["R"]);
    }

    #[test]
    fn test_mana_cost_order_preserved() {
        let fields = extractor().extract("Nicol Bolas {U}{B}{B}{R}");
        assert_eq!(
            fields.mana_cost.unwrap().value,
            vec!["U", "B", "B", "R"]
        );
    }

    #[test]
    fn test_power_toughness_anywhere() {
        let fields = extractor().extract("some garbled text\n3/4\nmore text");
        assert_eq!(fields.power.as_ref().unwrap().value, "3");
        assert_eq!(fields.toughness.as_ref().unwrap().value, "4");
    }

    #[test]
    fn test_power_toughness_star_and_x() {
        let fields = extractor().extract("Tarmogoyf\n*/1+*");
        assert_eq!(fields.power.as_ref().unwrap().value, "*");

        let fields = extractor().extract("Name\nX/X");
        assert_eq!(fields.power.as_ref().unwrap().value, "X");
        assert_eq!(fields.toughness.as_ref().unwrap().value, "X");
    }

    #[test]
    fn test_collector_fraction_not_mistaken_for_power() {
        let fields = extractor().extract("Serra Angel\n123/264");
        assert_eq!(fields.collector_number.as_ref().unwrap().value, "123");
        assert!(fields.power.is_none());
    }

    #[test]
    fn test_small_fraction_is_power_not_collector() {
        let fields = extractor().extract("3/4");
        assert_eq!(fields.power.as_ref().unwrap().value, "3");
        assert!(fields.collector_number.is_none());
    }

    #[test]
    fn test_collector_hash_fallback_scores_lower() {
        let primary = extractor().extract("Shock card 45/280");
        let fallback = extractor().extract("Shock card #45");
        assert_eq!(primary.collector_number.as_ref().unwrap().value, "45");
        assert_eq!(fallback.collector_number.as_ref().unwrap().value, "45");
        assert!(
            fallback.collector_number.unwrap().confidence
                < primary.collector_number.unwrap().confidence
        );
    }

    #[test]
    fn test_bracketed_set_code() {
        let fields = extractor().extract("Shock\n[M21] 45/280");
        assert_eq!(fields.set_code.as_ref().unwrap().value, "M21");
        assert!((fields.set_code.unwrap().confidence - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_copyright_adjacent_set_code_fallback() {
        let fields = extractor().extract("Shock\n© 1999 WOTC");
        assert_eq!(fields.set_code.as_ref().unwrap().value, "WOTC");
        assert!((fields.set_code.unwrap().confidence - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_rarity_vocabulary() {
        let fields = extractor().extract("Shock\nCommon");
        assert_eq!(fields.rarity.unwrap().value, "common");

        let fields = extractor().extract("Elderscale Wurm\nMythic Rare");
        assert_eq!(fields.rarity.unwrap().value, "mythic");
    }

    #[test]
    fn test_type_line() {
        let fields = extractor().extract("Grizzly Bears {1}{G}\nCreature - Bear\n2/2");
        assert_eq!(fields.type_line.unwrap().value, "Creature - Bear");
    }

    #[test]
    fn test_artist_credit() {
        let fields = extractor().extract("Shock\nIllus. Randy Gallegos");
        assert_eq!(fields.artist.as_ref().unwrap().value, "Randy Gallegos");

        let fields = extractor().extract("Shock\nArtist: Randy Gallegos");
        assert_eq!(fields.artist.unwrap().value, "Randy Gallegos");
    }

    #[test]
    fn test_copyright_year_primary_and_fallback() {
        let primary = extractor().extract("Shock\n© 1999 Wizards");
        assert_eq!(primary.copyright_year.as_ref().unwrap().value, 1999);
        assert!((primary.copyright_year.unwrap().confidence - 0.9).abs() < 0.001);

        let fallback = extractor().extract("Shock\n1999");
        assert_eq!(fallback.copyright_year.as_ref().unwrap().value, 1999);
        assert!((fallback.copyright_year.unwrap().confidence - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_name_repair_only_between_letters() {
        let fields = extractor().extract("C0ld-Eyed Selkie {2}{G}{U}");
        assert_eq!(fields.card_name.unwrap().value, "Cold-Eyed Selkie");

        // Digit fields are untouched by the name repair
        let fields = extractor().extract("Shock\n123/264\n© 2020");
        assert_eq!(fields.collector_number.unwrap().value, "123");
        assert_eq!(fields.copyright_year.unwrap().value, 2020);
    }

    #[test]
    fn test_name_terminated_by_digit_run() {
        let fields = extractor().extract("Serra Angel 4/4");
        assert_eq!(fields.card_name.unwrap().value, "Serra Angel");
    }

    #[test]
    fn test_name_terminated_by_dash() {
        let fields = extractor().extract("Shock - Instant");
        assert_eq!(fields.card_name.unwrap().value, "Shock");
    }

    #[test]
    fn test_cleaned_name_strips_noise_and_stop_words() {
        let fields = extractor().extract("Gaea's Cradle, the Great");
        assert_eq!(fields.cleaned_card_name.as_deref(), Some("Gaea's Cradle Great"));
    }

    #[test]
    fn test_implausibly_long_name_demoted() {
        let long = "Azusa Lost But Seeking Wandering Through Endless Forest Paths";
        let fields = extractor().extract(long);
        let name = fields.card_name.unwrap();
        assert!(name.confidence < CONFIDENCE_PRIMARY);
    }

    #[test]
    fn test_aggregate_confidence_is_mean() {
        // Name (0.9) + mana (0.9) only
        let fields = extractor().extract("Lightning Bolt {R}");
        assert!((fields.aggregate_confidence() - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_fallback_name_for_lowercase_input() {
        let fields = extractor().extract("lightning bolt");
        let name = fields.card_name.unwrap();
        assert_eq!(name.value, "lightning bolt");
        assert!((name.confidence - CONFIDENCE_FALLBACK).abs() < 0.001);
    }
}
