use std::collections::BTreeSet;

use chrono::Local;
use tracing::warn;

use crate::{
    errors::FetchError,
    market::{catalog, QuoteFetcher, QuoteRequest},
    menu::{render, Screen},
    messaging::types::Reply,
};

/// Renders screens, loading live data for the data-bearing ones.
///
/// Every call to [`MenuMachine::render`] for a data screen performs a fresh
/// fetch. A failed fetch yields [`Screen::Unavailable`] so the conversation
/// always has a next screen.
#[derive(Clone)]
pub struct MenuMachine {
    fetcher: QuoteFetcher,
}

impl MenuMachine {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &QuoteFetcher {
        &self.fetcher
    }

    pub async fn render(&self, screen: Screen) -> Reply {
        let screen = match screen {
            Screen::Unavailable { retry } => *retry,
            other => other,
        };

        match self.load_text(&screen).await {
            Ok(text) => Reply::text(text).with_keyboard(screen.keyboard()),
            Err(err) => {
                warn!(screen = %screen.key(), error = %err, "screen data unavailable");
                render_unavailable(screen, &err)
            }
        }
    }

    async fn load_text(&self, screen: &Screen) -> Result<String, FetchError> {
        match screen {
            Screen::MainMenu => Ok(render::main_menu()),
            Screen::Help => Ok(render::help()),
            Screen::CryptoList => {
                let ids: BTreeSet<String> = catalog::instrument_ids().map(String::from).collect();
                let quotes = self.fetcher.fetch_crypto(&ids).await?;
                if quotes.is_empty() {
                    return Err(FetchError::SourceUnavailable(
                        "no quotes in response".to_string(),
                    ));
                }
                Ok(render::crypto_list(&quotes, &now()))
            }
            Screen::CurrencyList => {
                let rates = self.fetcher.fetch_rates().await?;
                Ok(render::currency_list(&rates, &now()))
            }
            Screen::InstrumentDetail(id) => {
                let req = QuoteRequest::new([id.as_str()], "usd")
                    .with_extra_currency(catalog::LOCAL_CURRENCY)
                    .with_market_cap();
                let quotes = self.fetcher.fetch_quotes(&req).await?;
                let quote = quotes
                    .get(id)
                    .ok_or_else(|| FetchError::SourceUnavailable(format!("no quote for {id}")))?;
                Ok(render::instrument_detail(id, quote, &now()))
            }
            Screen::Unavailable { .. } => Ok(render::main_menu()),
        }
    }
}

pub(crate) fn render_unavailable(retry: Screen, err: &FetchError) -> Reply {
    let text = render::unavailable(&retry, err);
    let screen = Screen::Unavailable {
        retry: Box::new(retry),
    };
    Reply::text(text).with_keyboard(screen.keyboard())
}

fn now() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::{atomic::Ordering, Arc};

    use super::*;
    use crate::{
        menu::Action,
        testing::{sample_quotes, FakeQuotes, FakeRates},
    };

    fn machine(quotes: Arc<FakeQuotes>, primary: Arc<FakeRates>, fallback: Arc<FakeRates>) -> MenuMachine {
        MenuMachine::new(QuoteFetcher::new(quotes, primary, fallback))
    }

    fn healthy() -> (MenuMachine, Arc<FakeQuotes>, Arc<FakeRates>) {
        let quotes = Arc::new(FakeQuotes::ok(sample_quotes()));
        let rates = Arc::new(FakeRates::ok(&[("EUR", 0.9), ("RUB", 90.0)]));
        (machine(quotes.clone(), rates.clone(), rates.clone()), quotes, rates)
    }

    #[tokio::test]
    async fn refresh_fetches_every_time() {
        let (m, quotes, _) = healthy();
        let refresh = Action::refresh(&Screen::CryptoList);

        let first = m.render(refresh.target()).await;
        let second = m.render(refresh.target()).await;

        assert_eq!(quotes.calls.load(Ordering::SeqCst), 2);
        assert!(first.text.contains("CRYPTO"));
        assert!(second.actions().any(|a| a == "refresh:crypto"));
    }

    #[tokio::test]
    async fn static_screens_do_not_fetch() {
        let (m, quotes, rates) = healthy();
        let menu = m.render(Screen::MainMenu).await;
        let help = m.render(Screen::Help).await;

        assert!(menu.text.contains("Main menu"));
        assert!(help.text.contains("/calc"));
        assert_eq!(quotes.calls.load(Ordering::SeqCst), 0);
        assert_eq!(rates.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn crypto_failure_renders_retryable_error_screen() {
        let quotes = Arc::new(FakeQuotes::err(FetchError::Timeout("coingecko".to_string())));
        let rates = Arc::new(FakeRates::ok(&[("EUR", 0.9)]));
        let m = machine(quotes, rates.clone(), rates);

        let reply = m.render(Screen::CryptoList).await;
        assert!(reply.text.contains("took too long"));
        let actions: Vec<&str> = reply.actions().collect();
        assert_eq!(actions, vec!["refresh:crypto", "back"]);
    }

    #[tokio::test]
    async fn empty_quote_result_is_treated_as_unavailable() {
        let quotes = Arc::new(FakeQuotes::ok(Default::default()));
        let rates = Arc::new(FakeRates::ok(&[]));
        let m = machine(quotes, rates.clone(), rates);

        let reply = m.render(Screen::CryptoList).await;
        assert!(reply.actions().any(|a| a == "refresh:crypto"));
        assert!(reply.text.contains("unavailable"));
    }

    #[tokio::test]
    async fn currency_list_survives_primary_outage() {
        let quotes = Arc::new(FakeQuotes::ok(sample_quotes()));
        let primary = Arc::new(FakeRates::err(FetchError::SourceUnavailable("503".to_string())));
        let fallback = Arc::new(FakeRates::ok(&[("RUB", 91.0)]));
        let m = machine(quotes, primary, fallback);

        let reply = m.render(Screen::CurrencyList).await;
        assert!(reply.text.contains("1 USD = 91.00 RUB"));
        assert!(reply.actions().any(|a| a == "refresh:currency"));
    }

    #[tokio::test]
    async fn currency_list_when_everything_is_down() {
        let quotes = Arc::new(FakeQuotes::ok(sample_quotes()));
        let down = Arc::new(FakeRates::err(FetchError::SourceUnavailable("503".to_string())));
        let m = machine(quotes, down.clone(), down);

        let reply = m.render(Screen::CurrencyList).await;
        assert!(reply.text.contains("No exchange-rate provider answered"));
        let actions: Vec<&str> = reply.actions().collect();
        assert_eq!(actions, vec!["refresh:currency", "back"]);
    }

    #[tokio::test]
    async fn detail_requests_local_price_and_market_cap() {
        let (m, quotes, _) = healthy();
        let reply = m
            .render(Screen::InstrumentDetail("bitcoin".to_string()))
            .await;

        assert!(reply.text.contains("BITCOIN (BTC)"));
        let req = quotes.last_request().unwrap();
        assert!(req.include_market_cap);
        assert_eq!(req.vs_currencies_param(), "usd,rub");
        assert!(reply.actions().any(|a| a == "refresh:detail:bitcoin"));
    }

    #[tokio::test]
    async fn detail_missing_from_result_is_unavailable() {
        let (m, _, _) = healthy();
        let reply = m
            .render(Screen::InstrumentDetail("solana".to_string()))
            .await;
        let actions: Vec<&str> = reply.actions().collect();
        assert_eq!(actions, vec!["refresh:detail:solana", "back"]);
    }

    #[tokio::test]
    async fn rendering_an_error_screen_retries_its_target() {
        let (m, quotes, _) = healthy();
        let reply = m
            .render(Screen::Unavailable {
                retry: Box::new(Screen::CryptoList),
            })
            .await;
        assert!(reply.text.contains("CRYPTO"));
        assert_eq!(quotes.calls.load(Ordering::SeqCst), 1);
    }
}
