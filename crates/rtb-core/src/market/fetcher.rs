use std::{collections::BTreeSet, sync::Arc};

use tracing::{debug, warn};

use crate::{
    errors::FetchError,
    market::types::{QuoteRequest, QuoteResult, RateTable},
    ports::{QuoteSource, RateSource},
};

/// Fetches market data from ranked providers.
///
/// Crypto quotes come from a single provider. Exchange rates try the primary
/// provider once and, on any failure, the fallback provider once. Nothing is
/// cached: every call is a live round trip.
#[derive(Clone)]
pub struct QuoteFetcher {
    quotes: Arc<dyn QuoteSource>,
    rates_primary: Arc<dyn RateSource>,
    rates_fallback: Arc<dyn RateSource>,
}

impl QuoteFetcher {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        rates_primary: Arc<dyn RateSource>,
        rates_fallback: Arc<dyn RateSource>,
    ) -> Self {
        Self {
            quotes,
            rates_primary,
            rates_fallback,
        }
    }

    /// USD quotes (with 24h change) for `ids`.
    pub async fn fetch_crypto(&self, ids: &BTreeSet<String>) -> Result<QuoteResult, FetchError> {
        let req = QuoteRequest::new(ids.iter().cloned(), "usd");
        self.fetch_quotes(&req).await
    }

    pub async fn fetch_quotes(&self, req: &QuoteRequest) -> Result<QuoteResult, FetchError> {
        match self.quotes.fetch_quotes(req).await {
            Ok(result) => {
                debug!(source = self.quotes.name(), count = result.len(), "quotes fetched");
                Ok(result)
            }
            Err(e) => {
                warn!(source = self.quotes.name(), error = %e, "quote fetch failed");
                Err(e)
            }
        }
    }

    pub async fn fetch_rates(&self) -> Result<RateTable, FetchError> {
        let primary_err = match self.rates_primary.fetch_rates().await {
            Ok(table) => return Ok(table),
            Err(e) => e,
        };
        warn!(
            source = self.rates_primary.name(),
            fallback = self.rates_fallback.name(),
            error = %primary_err,
            "primary rate source failed, trying fallback"
        );

        match self.rates_fallback.fetch_rates().await {
            Ok(table) => Ok(table),
            Err(e) => {
                warn!(source = self.rates_fallback.name(), error = %e, "fallback rate source failed");
                Err(FetchError::AllSourcesExhausted)
            }
        }
    }
}
