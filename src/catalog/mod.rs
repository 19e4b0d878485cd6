//! Card catalog data model and collaborator boundary
//!
//! The catalog owns these entities; this crate only holds read-only
//! snapshots taken at lookup time.

pub mod scryfall;

pub use scryfall::ScryfallClient;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A canonical catalog entry, independent of any specific printing
///
/// The printing-level attributes (`set`, `collector_number`, `rarity`,
/// `artist`) describe the representative printing the search endpoint
/// reported and feed the candidate ranker.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardRecord {
    /// Stable catalog identifier
    pub id: String,
    /// Canonical card name
    pub name: String,
    /// Full type line
    pub type_line: Option<String>,
    /// Mana cost string
    pub mana_cost: Option<String>,
    /// Creature power
    pub power: Option<String>,
    /// Creature toughness
    pub toughness: Option<String>,
    /// Set code of the representative printing
    pub set: Option<String>,
    /// Collector number of the representative printing
    pub collector_number: Option<String>,
    /// Rarity of the representative printing
    pub rarity: Option<String>,
    /// Artist of the representative printing
    pub artist: Option<String>,
}

/// Price observations for one printing, in USD
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Prices {
    /// Nonfoil price
    pub usd: Option<f64>,
    /// Foil price
    pub usd_foil: Option<f64>,
}

/// One specific printing of a catalog entry
///
/// Immutable snapshot; one `CardRecord` owns many of these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditionRecord {
    /// Set code
    pub set: String,
    /// Full set name
    pub set_name: String,
    /// Collector number within the set
    pub collector_number: String,
    /// Release date
    pub released_at: Option<NaiveDate>,
    /// Rarity (mythic, rare, uncommon, common)
    pub rarity: String,
    /// Border color (black, white, silver, gold, borderless)
    pub border_color: String,
    /// Frame style
    pub frame: String,
    /// Promotional printing
    pub promo: bool,
    /// Full-art treatment
    pub full_art: bool,
    /// Textless treatment
    pub textless: bool,
    /// Oversized printing
    pub oversized: bool,
    /// Available in foil
    pub foil: bool,
    /// Available in nonfoil
    pub nonfoil: bool,
    /// Price observations
    pub prices: Prices,
    /// Artist credit
    pub artist: Option<String>,
    /// Card image reference
    pub image_uri: Option<String>,
}

impl EditionRecord {
    /// Best available USD price, preferring nonfoil over foil
    pub fn best_price_usd(&self) -> Option<f64> {
        self.prices.usd.or(self.prices.usd_foil)
    }

    /// Year of release, when the release date is known
    pub fn release_year(&self) -> Option<i32> {
        self.released_at.map(|date| date.year())
    }
}

/// Contract for the external card catalog
///
/// The only asynchronous boundary in the pipeline. Implementations own
/// transport concerns (timeouts, retries); this crate never retries.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Search the catalog by card name, returning candidates in catalog order
    async fn search(&self, name: &str) -> Result<Vec<CardRecord>, CatalogError>;

    /// All printings of a catalog entry, ordered by release date ascending
    async fn prints(&self, card_id: &str) -> Result<Vec<EditionRecord>, CatalogError>;
}
