//! Market data: request/result types, provider response normalization,
//! presentation helpers and the fallback-aware fetcher.

pub mod catalog;
pub mod fetcher;
pub mod format;
pub mod normalize;
pub mod types;

pub use fetcher::QuoteFetcher;
pub use types::{Quote, QuoteRequest, QuoteResult, RateTable, BASE_CURRENCY};
