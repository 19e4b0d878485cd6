//! Scryfall catalog client
//!
//! Thin HTTP client over the Scryfall REST API. Outbound requests are
//! serialized with a minimum inter-request interval to respect the API's
//! rate limit. A not-found exact search gets exactly one fuzzy-mode
//! fallback before failure surfaces; transient server errors are not
//! retried here (retry policy belongs to the transport layer).

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{CardRecord, CatalogClient, EditionRecord, Prices};
use crate::config::CatalogConfig;
use crate::error::CatalogError;

/// HTTP client for the Scryfall card catalog
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl ScryfallClient {
    /// Create a client from catalog settings
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            min_interval: config.min_request_interval(),
            last_request: Mutex::new(None),
        })
    }

    /// Cooperative delay enforcing the minimum inter-request interval
    ///
    /// Requests are not issued in parallel from this pipeline, so a single
    /// last-request timestamp behind an async mutex is enough.
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        self.throttle().await;

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "catalog request");
        let response = self.http.get(&url).query(query).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(CatalogError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(CatalogError::RateLimited),
            _ => {
                let response = response.error_for_status()?;
                Ok(response.json().await?)
            }
        }
    }
}

#[async_trait]
impl CatalogClient for ScryfallClient {
    async fn search(&self, name: &str) -> Result<Vec<CardRecord>, CatalogError> {
        // Exact-name search first; garbled OCR names frequently miss, so a
        // 404 gets one fuzzy-mode fallback before failing.
        let exact_query = format!("!\"{name}\"");
        match self
            .get_json::<ScryfallList>("/cards/search", &[("q", exact_query.as_str())])
            .await
        {
            Ok(list) => Ok(list.data.into_iter().map(ScryfallCard::into_card).collect()),
            Err(CatalogError::NotFound) => {
                warn!(name, "exact search missed, trying fuzzy lookup");
                let card: ScryfallCard = self
                    .get_json("/cards/named", &[("fuzzy", name)])
                    .await?;
                Ok(vec![card.into_card()])
            }
            Err(e) => Err(e),
        }
    }

    async fn prints(&self, card_id: &str) -> Result<Vec<EditionRecord>, CatalogError> {
        let query = format!("oracleid:{card_id}");
        let list: ScryfallList = self
            .get_json(
                "/cards/search",
                &[
                    ("q", query.as_str()),
                    ("unique", "prints"),
                    ("order", "released"),
                    ("dir", "asc"),
                ],
            )
            .await?;
        Ok(list.data.into_iter().map(ScryfallCard::into_edition).collect())
    }
}

#[derive(Debug, Deserialize)]
struct ScryfallList {
    #[serde(default)]
    data: Vec<ScryfallCard>,
}

/// Wire representation of a Scryfall card object (one printing)
#[derive(Debug, Deserialize)]
struct ScryfallCard {
    id: String,
    oracle_id: Option<String>,
    name: String,
    type_line: Option<String>,
    mana_cost: Option<String>,
    power: Option<String>,
    toughness: Option<String>,
    #[serde(default)]
    set: String,
    #[serde(default)]
    set_name: String,
    #[serde(default)]
    collector_number: String,
    released_at: Option<String>,
    #[serde(default)]
    rarity: String,
    #[serde(default)]
    border_color: String,
    #[serde(default)]
    frame: String,
    #[serde(default)]
    promo: bool,
    #[serde(default)]
    full_art: bool,
    #[serde(default)]
    textless: bool,
    #[serde(default)]
    oversized: bool,
    #[serde(default)]
    foil: bool,
    #[serde(default)]
    nonfoil: bool,
    prices: Option<ScryfallPrices>,
    artist: Option<String>,
    image_uris: Option<ScryfallImageUris>,
}

/// Prices arrive as decimal strings; absent entries stay `None`
#[derive(Debug, Deserialize)]
struct ScryfallPrices {
    usd: Option<String>,
    usd_foil: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScryfallImageUris {
    normal: Option<String>,
    large: Option<String>,
}

impl ScryfallCard {
    /// Map to the oracle-level catalog entry; the oracle id is the stable
    /// print-independent identifier
    fn into_card(self) -> CardRecord {
        CardRecord {
            id: self.oracle_id.unwrap_or(self.id),
            name: self.name,
            type_line: self.type_line,
            mana_cost: self.mana_cost,
            power: self.power,
            toughness: self.toughness,
            set: Some(self.set).filter(|s| !s.is_empty()),
            collector_number: Some(self.collector_number).filter(|s| !s.is_empty()),
            rarity: Some(self.rarity).filter(|s| !s.is_empty()),
            artist: self.artist,
        }
    }

    fn into_edition(self) -> EditionRecord {
        let prices = self
            .prices
            .map(|p| Prices {
                usd: p.usd.and_then(|v| v.parse().ok()),
                usd_foil: p.usd_foil.and_then(|v| v.parse().ok()),
            })
            .unwrap_or_default();
        let released_at = self
            .released_at
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok());
        let image_uri = self.image_uris.and_then(|uris| uris.normal.or(uris.large));

        EditionRecord {
            set: self.set,
            set_name: self.set_name,
            collector_number: self.collector_number,
            released_at,
            rarity: self.rarity,
            border_color: self.border_color,
            frame: self.frame,
            promo: self.promo,
            full_art: self.full_art,
            textless: self.textless,
            oversized: self.oversized,
            foil: self.foil,
            nonfoil: self.nonfoil,
            prices,
            artist: self.artist,
            image_uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD_JSON: &str = r#"{
        "id": "print-uuid",
        "oracle_id": "oracle-uuid",
        "name": "Lightning Bolt",
        "type_line": "Instant",
        "mana_cost": "{R}",
        "set": "m11",
        "set_name": "Magic 2011",
        "collector_number": "149",
        "released_at": "2010-07-16",
        "rarity": "common",
        "border_color": "black",
        "frame": "2003",
        "promo": false,
        "full_art": false,
        "foil": true,
        "nonfoil": true,
        "prices": { "usd": "2.53", "usd_foil": "11.20", "eur": "1.90" },
        "artist": "Christopher Moeller",
        "image_uris": { "normal": "https://img.example/bolt.jpg" }
    }"#;

    #[test]
    fn test_card_mapping_uses_oracle_id() {
        let card: ScryfallCard = serde_json::from_str(CARD_JSON).unwrap();
        let record = card.into_card();
        assert_eq!(record.id, "oracle-uuid");
        assert_eq!(record.name, "Lightning Bolt");
        assert_eq!(record.set.as_deref(), Some("m11"));
        assert_eq!(record.rarity.as_deref(), Some("common"));
    }

    #[test]
    fn test_edition_mapping_parses_prices_and_date() {
        let card: ScryfallCard = serde_json::from_str(CARD_JSON).unwrap();
        let edition = card.into_edition();
        assert_eq!(edition.prices.usd, Some(2.53));
        assert_eq!(edition.prices.usd_foil, Some(11.20));
        assert_eq!(
            edition.released_at,
            NaiveDate::from_ymd_opt(2010, 7, 16)
        );
        assert_eq!(edition.image_uri.as_deref(), Some("https://img.example/bolt.jpg"));
        assert_eq!(edition.border_color, "black");
    }

    #[test]
    fn test_missing_prices_stay_absent() {
        let json = r#"{ "id": "x", "name": "Shock", "prices": { "usd": null, "usd_foil": null } }"#;
        let card: ScryfallCard = serde_json::from_str(json).unwrap();
        let edition = card.into_edition();
        assert_eq!(edition.best_price_usd(), None);
        assert_eq!(edition.released_at, None);
    }

    #[test]
    fn test_unparseable_price_is_none() {
        let json = r#"{ "id": "x", "name": "Shock", "prices": { "usd": "n/a", "usd_foil": null } }"#;
        let card: ScryfallCard = serde_json::from_str(json).unwrap();
        assert_eq!(card.into_edition().prices.usd, None);
    }

    #[test]
    fn test_client_construction() {
        let client = ScryfallClient::new(&CatalogConfig::default()).unwrap();
        assert_eq!(client.base_url, "https://api.scryfall.com");
        assert_eq!(client.min_interval, Duration::from_millis(100));
    }
}
