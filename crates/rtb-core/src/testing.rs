//! In-memory port implementations shared by unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::{
    errors::FetchError,
    market::{Quote, QuoteRequest, QuoteResult, RateTable},
    ports::{QuoteSource, RateSource},
};

pub struct FakeQuotes {
    result: Result<QuoteResult, FetchError>,
    pub calls: AtomicUsize,
    last: Mutex<Option<QuoteRequest>>,
}

impl FakeQuotes {
    pub fn ok(result: QuoteResult) -> Self {
        Self {
            result: Ok(result),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn err(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<QuoteRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuoteSource for FakeQuotes {
    fn name(&self) -> &str {
        "fake-quotes"
    }

    async fn fetch_quotes(&self, req: &QuoteRequest) -> Result<QuoteResult, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(req.clone());
        self.result.clone()
    }
}

pub struct FakeRates {
    result: Result<RateTable, FetchError>,
    pub calls: AtomicUsize,
}

impl FakeRates {
    pub fn ok(rates: &[(&str, f64)]) -> Self {
        Self {
            result: Ok(RateTable::from_rates(rates.iter().copied())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn err(err: FetchError) -> Self {
        Self {
            result: Err(err),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl RateSource for FakeRates {
    fn name(&self) -> &str {
        "fake-rates"
    }

    async fn fetch_rates(&self) -> Result<RateTable, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

pub fn sample_quotes() -> QuoteResult {
    let mut out = QuoteResult::new();
    out.insert(
        "bitcoin".to_string(),
        Quote {
            price: 65000.5,
            change_24h: Some(2.5),
            market_cap: Some(1.28e12),
            converted: [("rub".to_string(), 6_000_000.0)].into(),
        },
    );
    out.insert(
        "ethereum".to_string(),
        Quote {
            price: 3200.0,
            change_24h: Some(-1.5),
            market_cap: None,
            converted: Default::default(),
        },
    );
    out.insert(
        "dogecoin".to_string(),
        Quote {
            price: 0.123456,
            change_24h: None,
            market_cap: None,
            converted: Default::default(),
        },
    );
    out
}
