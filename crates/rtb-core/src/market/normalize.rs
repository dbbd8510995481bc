//! Flatten provider-specific response envelopes into [`QuoteResult`] and
//! [`RateTable`].
//!
//! Providers:
//! - CoinGecko `simple/price`: `{"bitcoin": {"usd": 1.0, "usd_24h_change": 0.5, "usd_market_cap": 2.0, "rub": 90.0}}`
//! - ExchangeRate-API: `{"base": "USD", "rates": {"EUR": 0.9, ...}}`
//! - currency-api: `{"date": "2024-01-01", "usd": {"eur": 0.9, ...}}`

use serde_json::Value;

use crate::{
    errors::FetchError,
    market::types::{Quote, QuoteRequest, QuoteResult, RateTable},
};

/// Normalize a CoinGecko `simple/price` body.
///
/// Entries without a usable price in the target unit are dropped; optional
/// fields (24h change, market cap, extra units) may be absent.
pub fn simple_price(body: &Value, req: &QuoteRequest, source: &str) -> Result<QuoteResult, FetchError> {
    let obj = body.as_object().ok_or_else(|| unexpected_shape(source))?;

    let vs = req.vs_currency.as_str();
    let change_key = format!("{vs}_24h_change");
    let cap_key = format!("{vs}_market_cap");

    let mut out = QuoteResult::new();
    for (id, entry) in obj {
        if !req.ids.is_empty() && !req.ids.contains(id) {
            continue;
        }
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let Some(price) = entry.get(vs).and_then(finite) else {
            continue;
        };
        if price < 0.0 {
            continue;
        }

        let converted = req
            .extra_currencies
            .iter()
            .filter_map(|c| {
                entry
                    .get(c)
                    .and_then(finite)
                    .filter(|v| *v >= 0.0)
                    .map(|v| (c.clone(), v))
            })
            .collect();

        out.insert(
            id.clone(),
            Quote {
                price,
                change_24h: entry.get(&change_key).and_then(finite),
                market_cap: entry.get(&cap_key).and_then(finite).filter(|v| *v >= 0.0),
                converted,
            },
        );
    }

    Ok(out)
}

/// Normalize an ExchangeRate-API body (rates under `rates`).
pub fn exchange_rate_api(body: &Value, source: &str) -> Result<RateTable, FetchError> {
    rates_under(body, "rates", source)
}

/// Normalize a currency-api body (rates under the lower-case base code).
pub fn currency_api(body: &Value, source: &str) -> Result<RateTable, FetchError> {
    rates_under(body, "usd", source)
}

fn rates_under(body: &Value, field: &str, source: &str) -> Result<RateTable, FetchError> {
    let rates = body
        .get(field)
        .and_then(Value::as_object)
        .ok_or_else(|| unexpected_shape(source))?;

    let table = RateTable::from_rates(
        rates
            .iter()
            .filter_map(|(code, v)| finite(v).map(|r| (code.as_str(), r))),
    );

    // Only the pinned base survived: nothing usable came back.
    if table.len() <= 1 {
        return Err(FetchError::SourceUnavailable(format!(
            "{source}: response contained no rates"
        )));
    }
    Ok(table)
}

fn finite(v: &Value) -> Option<f64> {
    v.as_f64().filter(|f| f.is_finite())
}

fn unexpected_shape(source: &str) -> FetchError {
    FetchError::SourceUnavailable(format!("{source}: unexpected response shape"))
}
