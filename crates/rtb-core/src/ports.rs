use async_trait::async_trait;

use crate::{
    errors::FetchError,
    market::{QuoteRequest, QuoteResult, RateTable},
};

/// Hexagonal port for a crypto quote provider.
///
/// Implementations convert every transport failure into a [`FetchError`] and
/// return normalized data only.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_quotes(&self, req: &QuoteRequest) -> Result<QuoteResult, FetchError>;
}

/// Hexagonal port for an exchange-rate provider (rates relative to USD).
#[async_trait]
pub trait RateSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_rates(&self) -> Result<RateTable, FetchError>;
}
