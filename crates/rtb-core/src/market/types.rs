use std::collections::{BTreeMap, BTreeSet};

/// Every rate in a [`RateTable`] is quoted against this currency.
pub const BASE_CURRENCY: &str = "USD";

/// What to ask a quote provider for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRequest {
    pub ids: BTreeSet<String>,
    /// Unit of [`Quote::price`], lower-case (`usd`).
    pub vs_currency: String,
    /// Additional units reported in [`Quote::converted`].
    pub extra_currencies: Vec<String>,
    pub include_market_cap: bool,
}

impl QuoteRequest {
    pub fn new<I, S>(ids: I, vs_currency: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
            vs_currency: vs_currency.to_lowercase(),
            extra_currencies: Vec::new(),
            include_market_cap: false,
        }
    }

    pub fn with_extra_currency(mut self, currency: &str) -> Self {
        let c = currency.to_lowercase();
        if c != self.vs_currency && !self.extra_currencies.contains(&c) {
            self.extra_currencies.push(c);
        }
        self
    }

    pub fn with_market_cap(mut self) -> Self {
        self.include_market_cap = true;
        self
    }

    /// All units, target first, as a comma-separated query value.
    pub fn vs_currencies_param(&self) -> String {
        std::iter::once(self.vs_currency.as_str())
            .chain(self.extra_currencies.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn ids_param(&self) -> String {
        self.ids.iter().cloned().collect::<Vec<_>>().join(",")
    }
}

/// A price plus optional auxiliary fields for one instrument.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change_24h: Option<f64>,
    pub market_cap: Option<f64>,
    /// Price in the request's extra currencies, keyed by lower-case unit.
    pub converted: BTreeMap<String, f64>,
}

/// Instrument id → quote. Prices are always finite and non-negative.
pub type QuoteResult = BTreeMap<String, Quote>;

/// Currency code → rate relative to [`BASE_CURRENCY`].
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Build a table, keeping only strictly positive finite rates.
    ///
    /// Codes are upper-cased and the base currency is pinned to 1.0.
    pub fn from_rates<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut map: BTreeMap<String, f64> = rates
            .into_iter()
            .filter(|(_, r)| r.is_finite() && *r > 0.0)
            .map(|(code, r)| (code.as_ref().trim().to_uppercase(), r))
            .filter(|(code, _)| !code.is_empty())
            .collect();
        map.insert(BASE_CURRENCY.to_string(), 1.0);
        Self { rates: map }
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    /// How many units of `to` one unit of `from` buys.
    pub fn cross(&self, from: &str, to: &str) -> Option<f64> {
        Some(self.get(to)? / self.get(from)?)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_table_invariants() {
        let t = RateTable::from_rates([
            ("eur", 0.9),
            ("RUB", 90.0),
            ("BAD", 0.0),
            ("NEG", -1.0),
            ("NAN", f64::NAN),
            ("USD", 3.0),
        ]);
        assert_eq!(t.get("USD"), Some(1.0));
        assert_eq!(t.get("EUR"), Some(0.9));
        assert_eq!(t.get("eur"), Some(0.9));
        assert_eq!(t.get("BAD"), None);
        assert_eq!(t.get("NEG"), None);
        assert_eq!(t.get("NAN"), None);
        assert_eq!(t.len(), 3);
        assert!(t.iter().all(|(_, r)| r > 0.0));
    }

    #[test]
    fn cross_rates() {
        let t = RateTable::from_rates([("EUR", 0.5), ("RUB", 90.0)]);
        assert_eq!(t.cross("EUR", "RUB"), Some(180.0));
        assert_eq!(t.cross("USD", "RUB"), Some(90.0));
        assert_eq!(t.cross("XXX", "RUB"), None);
    }

    #[test]
    fn request_params() {
        let req = QuoteRequest::new(["ethereum", "bitcoin"], "USD")
            .with_extra_currency("rub")
            .with_extra_currency("usd")
            .with_market_cap();
        assert_eq!(req.ids_param(), "bitcoin,ethereum");
        assert_eq!(req.vs_currencies_param(), "usd,rub");
        assert!(req.include_market_cap);
    }
}
