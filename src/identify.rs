//! End-to-end identification pipeline
//!
//! Wires extraction, catalog lookup, ranking, and edition resolution
//! together behind a single entry point. Catalog lookups are memoized in
//! TTL-bounded caches keyed by the normalized query text.

use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::catalog::{CatalogClient, EditionRecord};
use crate::config::ScanConfig;
use crate::editions::{Disambiguation, EditionHints, EditionResolver, RankedEdition};
use crate::error::{CatalogError, IdentifyError};
use crate::extract::{ExtractedFields, FieldExtractor};
use crate::matching::{ranker, MatchResult};
use crate::recognition::RawRecognition;

/// Full result of identifying one scanned card
#[derive(Debug, Clone)]
pub struct Identification {
    /// Structured field guesses the identification was based on
    pub fields: ExtractedFields,
    /// Selected catalog candidate with blended match quality
    pub match_result: MatchResult,
    /// All printings of the matched card, ordered for display
    pub editions: Vec<RankedEdition>,
    /// Hint-based printing disambiguation
    pub disambiguation: Disambiguation,
}

/// Identifies scanned cards against a catalog
pub struct CardIdentifier<C: CatalogClient> {
    catalog: C,
    extractor: FieldExtractor,
    resolver: EditionResolver,
    match_cache: TtlCache<MatchResult>,
    edition_cache: TtlCache<Vec<EditionRecord>>,
}

impl<C: CatalogClient> CardIdentifier<C> {
    /// Create an identifier with default settings
    pub fn new(catalog: C) -> Self {
        Self::with_config(catalog, &ScanConfig::default())
    }

    /// Create an identifier with custom settings
    pub fn with_config(catalog: C, config: &ScanConfig) -> Self {
        let ttl = config.cache.ttl();
        Self {
            catalog,
            extractor: FieldExtractor::new(),
            resolver: EditionResolver::new(),
            match_cache: TtlCache::new(ttl),
            edition_cache: TtlCache::new(ttl),
        }
    }

    /// Identify a card from recognized text
    ///
    /// Edition hints are derived from the extracted fields alone; use
    /// [`identify_with_hints`](Self::identify_with_hints) when the caller
    /// has visual hints of its own.
    pub async fn identify(&self, raw: &RawRecognition) -> Result<Identification, IdentifyError> {
        self.identify_with_hints(raw, EditionHints::default()).await
    }

    /// Identify a card from recognized text plus caller-supplied hints
    ///
    /// A hint the caller leaves unset is filled from the extracted fields
    /// where possible (currently the copyright year).
    pub async fn identify_with_hints(
        &self,
        raw: &RawRecognition,
        mut hints: EditionHints,
    ) -> Result<Identification, IdentifyError> {
        let fields = self.extractor.extract(&raw.text);
        let name = fields
            .card_name
            .as_ref()
            .map(|f| f.value.clone())
            .ok_or(IdentifyError::NoTextExtracted)?;

        let cache_key = fields
            .cleaned_card_name
            .clone()
            .unwrap_or_else(|| name.clone())
            .to_lowercase();

        let match_result = match self.match_cache.get(&cache_key) {
            Some(cached) => {
                debug!(key = %cache_key, "match served from cache");
                cached
            }
            None => {
                let candidates = match self.catalog.search(&name).await {
                    Ok(candidates) => candidates,
                    Err(CatalogError::NotFound) => return Err(IdentifyError::NoCandidatesFound),
                    Err(e) => return Err(e.into()),
                };
                let result =
                    ranker::select_best(&candidates, &fields, raw.overall_confidence())
                        .ok_or(IdentifyError::NoCandidatesFound)?;
                self.match_cache.insert(cache_key.as_str(), result.clone());
                result
            }
        };

        let card_id = match_result.candidate.id.clone();
        let editions = match self.edition_cache.get(&card_id) {
            Some(cached) => cached,
            None => {
                let editions = self.catalog.prints(&card_id).await?;
                self.edition_cache.insert(card_id.as_str(), editions.clone());
                editions
            }
        };

        if hints.copyright_year.is_none() {
            hints.copyright_year = fields.copyright_year.as_ref().map(|f| f.value);
        }
        let disambiguation = self.resolver.disambiguate(&editions, &hints);
        let editions = self.resolver.rank_for_display(editions);

        info!(
            card = %match_result.candidate.name,
            quality = match_result.match_quality,
            editions = editions.len(),
            "identified card"
        );

        Ok(Identification {
            fields,
            match_result,
            editions,
            disambiguation,
        })
    }

    /// Borrow the underlying catalog client
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Drop all cached lookups
    pub fn clear_cache(&self) {
        self.match_cache.clear();
        self.edition_cache.clear();
    }
}
