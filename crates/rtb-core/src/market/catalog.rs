//! Instruments and currencies the bot tracks.

/// A tracked cryptocurrency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instrument {
    /// Provider id (CoinGecko).
    pub id: &'static str,
    pub name: &'static str,
    pub ticker: &'static str,
    pub glyph: &'static str,
}

impl Instrument {
    /// `₿ Bitcoin (BTC)`
    pub fn title(&self) -> String {
        format!("{} {} ({})", self.glyph, self.name, self.ticker)
    }

    /// Short button label, e.g. `₿ BTC`.
    pub fn button_label(&self) -> String {
        format!("{} {}", self.glyph, self.ticker)
    }
}

/// A tracked fiat currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub flag: &'static str,
    pub name: &'static str,
}

pub const INSTRUMENTS: &[Instrument] = &[
    Instrument { id: "bitcoin", name: "Bitcoin", ticker: "BTC", glyph: "₿" },
    Instrument { id: "ethereum", name: "Ethereum", ticker: "ETH", glyph: "Ξ" },
    Instrument { id: "tether", name: "Tether", ticker: "USDT", glyph: "₮" },
    Instrument { id: "binancecoin", name: "BNB", ticker: "BNB", glyph: "🔶" },
    Instrument { id: "solana", name: "Solana", ticker: "SOL", glyph: "◎" },
    Instrument { id: "ripple", name: "Ripple", ticker: "XRP", glyph: "✕" },
    Instrument { id: "cardano", name: "Cardano", ticker: "ADA", glyph: "₳" },
    Instrument { id: "dogecoin", name: "Dogecoin", ticker: "DOGE", glyph: "Ð" },
];

pub const CURRENCIES: &[Currency] = &[
    Currency { code: "RUB", flag: "🇷🇺", name: "Russian ruble" },
    Currency { code: "EUR", flag: "🇪🇺", name: "Euro" },
    Currency { code: "GBP", flag: "🇬🇧", name: "Pound sterling" },
    Currency { code: "JPY", flag: "🇯🇵", name: "Japanese yen" },
    Currency { code: "CNY", flag: "🇨🇳", name: "Chinese yuan" },
    Currency { code: "TRY", flag: "🇹🇷", name: "Turkish lira" },
    Currency { code: "UAH", flag: "🇺🇦", name: "Ukrainian hryvnia" },
    Currency { code: "KZT", flag: "🇰🇿", name: "Kazakhstani tenge" },
];

/// Reference currency for the "local" columns (RUB price, USD/RUB card).
pub const LOCAL_CURRENCY: &str = "RUB";

pub fn instrument(id: &str) -> Option<&'static Instrument> {
    INSTRUMENTS.iter().find(|i| i.id == id)
}

pub fn instrument_ids() -> impl Iterator<Item = &'static str> {
    INSTRUMENTS.iter().map(|i| i.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        assert_eq!(instrument("bitcoin").map(|i| i.ticker), Some("BTC"));
        assert!(instrument("nope").is_none());
        assert_eq!(instrument_ids().count(), INSTRUMENTS.len());
    }

    #[test]
    fn ids_fit_callback_payloads() {
        for i in INSTRUMENTS {
            assert!(i.id.len() <= 40);
            assert!(i.id.bytes().all(|b| b.is_ascii_lowercase() || b == b'-'));
        }
    }
}
