//! Edition ranking and disambiguation
//!
//! Orders the printings of a matched card for display and, when the scan
//! produced visual hints (border color, copyright year, set-symbol
//! description), ranks printings by how well they fit those hints. All
//! scoring constants are named; changing one changes observable behavior.

use chrono::Datelike;
use tracing::debug;

use crate::catalog::EditionRecord;

/// USD price contributes price * this, capped at [`PRICE_SCORE_CAP`]
pub const PRICE_SCORE_MULTIPLIER: f64 = 10.0;
/// Upper bound of the price contribution to the sort value
pub const PRICE_SCORE_CAP: f64 = 1000.0;
/// Sort-value bonus for promotional printings
pub const PROMO_BONUS: f64 = 150.0;
/// Sort-value bonus for full-art printings
pub const FULL_ART_BONUS: f64 = 100.0;
/// Sort-value bonus for textless printings
pub const TEXTLESS_BONUS: f64 = 75.0;
/// Sort-value bonus for borderless printings
pub const BORDERLESS_BONUS: f64 = 125.0;
/// Sort-value bonus for releases within [`RECENT_RELEASE_WINDOW_YEARS`]
pub const RECENT_RELEASE_BONUS: f64 = 50.0;
/// Years back from the current year that still count as recent
pub const RECENT_RELEASE_WINDOW_YEARS: i32 = 2;

/// Disambiguation score when a set-symbol description hint is present
pub const SET_SYMBOL_HINT_SCORE: i32 = 10;
/// Disambiguation score when the hinted border style matches
pub const BORDER_HINT_SCORE: i32 = 25;
/// Disambiguation score when the hinted copyright year fits the release
pub const YEAR_HINT_SCORE: i32 = 30;
/// Allowed distance between hinted year and release year
pub const YEAR_HINT_TOLERANCE: i32 = 1;

/// An edition with its display importance score
#[derive(Debug, Clone)]
pub struct RankedEdition {
    /// The printing
    pub edition: EditionRecord,
    /// Heuristic importance score used for display ordering
    pub sort_value: f64,
}

/// Partial visual hints recovered from the scanned card
#[derive(Debug, Clone, Default)]
pub struct EditionHints {
    /// Free-text description of the set symbol (presence is a weak signal;
    /// its content is not matched)
    pub set_symbol_description: Option<String>,
    /// Observed border style, matched as a substring of the border color
    pub border_style: Option<String>,
    /// Copyright year read off the card
    pub copyright_year: Option<i32>,
}

impl EditionHints {
    /// Whether any hint is set
    pub fn is_empty(&self) -> bool {
        self.set_symbol_description.is_none()
            && self.border_style.is_none()
            && self.copyright_year.is_none()
    }
}

/// One edition's fit against the hints
#[derive(Debug, Clone)]
pub struct EditionMatch {
    /// The printing
    pub edition: EditionRecord,
    /// Accumulated hint score
    pub confidence: i32,
    /// Human-readable notes on what matched
    pub reasons: Vec<String>,
}

/// Outcome of hint disambiguation
///
/// `has_matches == false` is an expected result of insufficient signal,
/// not a fault; the caller should ask the user to pick.
#[derive(Debug, Clone)]
pub struct Disambiguation {
    /// Whether any edition scored above zero
    pub has_matches: bool,
    /// Highest-scoring edition, when one exists
    pub best_match: Option<EditionMatch>,
    /// All scoring editions, highest first
    pub all_matches: Vec<EditionMatch>,
    /// Human-readable summary for display
    pub suggestion: String,
}

/// Min/max/mean of best available USD prices across editions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

/// Ranks and disambiguates the printings of a matched card
pub struct EditionResolver {
    current_year: i32,
}

impl EditionResolver {
    /// Create a resolver anchored to the current calendar year
    pub fn new() -> Self {
        Self {
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Create a resolver anchored to a specific year
    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    /// Order editions for display, most important first
    ///
    /// Stable: editions with equal sort values keep catalog order.
    pub fn rank_for_display(&self, editions: Vec<EditionRecord>) -> Vec<RankedEdition> {
        let mut ranked: Vec<RankedEdition> = editions
            .into_iter()
            .map(|edition| {
                let sort_value = self.sort_value(&edition);
                RankedEdition { edition, sort_value }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.sort_value
                .partial_cmp(&a.sort_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    /// Heuristic importance score for one edition
    pub fn sort_value(&self, edition: &EditionRecord) -> f64 {
        let mut value = 0.0;

        if let Some(price) = edition.best_price_usd() {
            value += (price * PRICE_SCORE_MULTIPLIER).min(PRICE_SCORE_CAP);
        }

        value += match edition.rarity.to_lowercase().as_str() {
            "mythic" => 100.0,
            "rare" => 75.0,
            "uncommon" => 50.0,
            "common" => 25.0,
            _ => 0.0,
        };

        if edition.promo {
            value += PROMO_BONUS;
        }
        if edition.full_art {
            value += FULL_ART_BONUS;
        }
        if edition.textless {
            value += TEXTLESS_BONUS;
        }
        if edition.border_color.eq_ignore_ascii_case("borderless") {
            value += BORDERLESS_BONUS;
        }

        if let Some(year) = edition.release_year() {
            if self.current_year - year <= RECENT_RELEASE_WINDOW_YEARS {
                value += RECENT_RELEASE_BONUS;
            }
        }

        value
    }

    /// Rank editions by how well they fit the recognition hints
    pub fn disambiguate(&self, editions: &[EditionRecord], hints: &EditionHints) -> Disambiguation {
        let mut matches: Vec<EditionMatch> = editions
            .iter()
            .map(|edition| self.score_hints(edition, hints))
            .filter(|m| m.confidence > 0)
            .collect();
        // Stable sort keeps catalog order on equal confidence
        matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));

        debug!(
            candidates = editions.len(),
            scoring = matches.len(),
            "disambiguated editions"
        );

        let best_match = matches.first().cloned();
        let suggestion = match &best_match {
            Some(best) => format!(
                "Most likely printing: {} ({}) #{}, matched on {}",
                best.edition.set_name,
                best.edition.set.to_uppercase(),
                best.edition.collector_number,
                best.reasons.join(", "),
            ),
            None => {
                "Not enough visual information to narrow down the printing; \
                 manual selection required"
                    .to_string()
            }
        };

        Disambiguation {
            has_matches: !matches.is_empty(),
            best_match,
            all_matches: matches,
            suggestion,
        }
    }

    fn score_hints(&self, edition: &EditionRecord, hints: &EditionHints) -> EditionMatch {
        let mut confidence = 0;
        let mut reasons = Vec::new();

        if let Some(symbol) = &hints.set_symbol_description {
            // Presence-only signal; the description text is not matched
            if symbol.trim().chars().count() >= 3 {
                confidence += SET_SYMBOL_HINT_SCORE;
                reasons.push("set symbol visible".to_string());
            }
        }

        if let Some(border) = &hints.border_style {
            if edition
                .border_color
                .to_lowercase()
                .contains(&border.to_lowercase())
            {
                confidence += BORDER_HINT_SCORE;
                reasons.push(format!("border color {}", edition.border_color));
            }
        }

        if let (Some(hinted), Some(release)) = (hints.copyright_year, edition.release_year()) {
            if (hinted - release).abs() <= YEAR_HINT_TOLERANCE {
                confidence += YEAR_HINT_SCORE;
                reasons.push(format!("release year {release} near {hinted}"));
            }
        }

        EditionMatch {
            edition: edition.clone(),
            confidence,
            reasons,
        }
    }
}

impl Default for EditionResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Summarize best available USD prices over editions that have pricing
///
/// `None` when no edition has a price observation.
pub fn price_range(editions: &[EditionRecord]) -> Option<PriceRange> {
    let prices: Vec<f64> = editions.iter().filter_map(|e| e.best_price_usd()).collect();
    if prices.is_empty() {
        return None;
    }
    let min = prices.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let average = prices.iter().sum::<f64>() / prices.len() as f64;
    Some(PriceRange { min, max, average })
}
