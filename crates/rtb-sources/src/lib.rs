//! HTTP quote-provider adapters.
//!
//! Implements the `rtb-core` quote/rate source ports over `reqwest`. All
//! adapters share one client (connection pool + timeout) and convert every
//! transport failure into a `FetchError`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use rtb_core::{
    config::Config,
    errors::{Error, FetchError},
    market::{normalize, QuoteFetcher, QuoteRequest, QuoteResult, RateTable},
    ports::{QuoteSource, RateSource},
    Result,
};

const USER_AGENT: &str = concat!("rtb/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used by every source.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| Error::External(format!("http client build failed: {e}")))
}

/// Wire the configured providers into a [`QuoteFetcher`].
pub fn fetcher_from_config(cfg: &Config) -> Result<QuoteFetcher> {
    let http = http_client(cfg.http_timeout)?;
    Ok(QuoteFetcher::new(
        Arc::new(CoinGeckoSource::new(http.clone(), &cfg.crypto_api_url)),
        Arc::new(ExchangeRateApiSource::new(http.clone(), &cfg.rates_api_url)),
        Arc::new(CurrencyApiSource::new(http, &cfg.rates_fallback_url)),
    ))
}

/// CoinGecko `simple/price` (crypto quotes).
#[derive(Clone, Debug)]
pub struct CoinGeckoSource {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoSource {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn query(req: &QuoteRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("ids", req.ids_param()),
            ("vs_currencies", req.vs_currencies_param()),
            ("include_24hr_change", "true".to_string()),
        ];
        if req.include_market_cap {
            query.push(("include_market_cap", "true".to_string()));
        }
        query
    }
}

#[async_trait]
impl QuoteSource for CoinGeckoSource {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_quotes(&self, req: &QuoteRequest) -> std::result::Result<QuoteResult, FetchError> {
        let request = self
            .http
            .get(format!("{}/simple/price", self.base_url))
            .query(&Self::query(req));
        let body = get_json(self.name(), request).await?;
        normalize::simple_price(&body, req, self.name())
    }
}

/// ExchangeRate-API `latest/USD` (primary exchange rates).
#[derive(Clone, Debug)]
pub struct ExchangeRateApiSource {
    http: reqwest::Client,
    url: String,
}

impl ExchangeRateApiSource {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiSource {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    async fn fetch_rates(&self) -> std::result::Result<RateTable, FetchError> {
        let body = get_json(self.name(), self.http.get(&self.url)).await?;
        normalize::exchange_rate_api(&body, self.name())
    }
}

/// currency-api `usd.json` (fallback exchange rates).
#[derive(Clone, Debug)]
pub struct CurrencyApiSource {
    http: reqwest::Client,
    url: String,
}

impl CurrencyApiSource {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RateSource for CurrencyApiSource {
    fn name(&self) -> &str {
        "currency-api"
    }

    async fn fetch_rates(&self) -> std::result::Result<RateTable, FetchError> {
        let body = get_json(self.name(), self.http.get(&self.url)).await?;
        normalize::currency_api(&body, self.name())
    }
}

async fn get_json(
    source: &str,
    request: reqwest::RequestBuilder,
) -> std::result::Result<Value, FetchError> {
    let resp = request.send().await.map_err(|e| map_err(source, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(FetchError::SourceUnavailable(format!(
            "{source}: HTTP {status}"
        )));
    }

    let body = resp.json::<Value>().await.map_err(|e| map_err(source, e))?;
    debug!(source, "response received");
    Ok(body)
}

fn map_err(source: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout(source.to_string())
    } else {
        FetchError::SourceUnavailable(format!("{source}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// One-shot HTTP server answering a single request with `status` and `body`.
    /// Returns the base URL and a handle yielding the raw request line.
    fn serve_once(status: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn client() -> reqwest::Client {
        http_client(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn coingecko_query_and_normalization() {
        let (base, handle) = serve_once(
            "200 OK",
            r#"{"bitcoin":{"usd":65000.0,"usd_24h_change":1.5,"usd_market_cap":1.2e12,"rub":6000000.0}}"#,
        );
        let source = CoinGeckoSource::new(client(), &base);
        let req = QuoteRequest::new(["bitcoin"], "usd")
            .with_extra_currency("rub")
            .with_market_cap();

        let out = source.fetch_quotes(&req).await.unwrap();
        assert_eq!(out["bitcoin"].price, 65000.0);
        assert_eq!(out["bitcoin"].market_cap, Some(1.2e12));

        let request_line = handle.join().unwrap();
        assert!(request_line.starts_with("GET /simple/price?"));
        assert!(request_line.contains("ids=bitcoin"));
        assert!(request_line.contains("vs_currencies=usd%2Crub"));
        assert!(request_line.contains("include_24hr_change=true"));
        assert!(request_line.contains("include_market_cap=true"));
    }

    #[tokio::test]
    async fn non_success_status_is_unavailable() {
        let (base, handle) = serve_once("429 Too Many Requests", r#"{"status":"limited"}"#);
        let source = CoinGeckoSource::new(client(), &base);
        let err = source
            .fetch_quotes(&QuoteRequest::new(["bitcoin"], "usd"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable(ref m) if m.contains("429")));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn rate_sources_share_one_shape_after_normalization() {
        let (primary_url, h1) = serve_once(
            "200 OK",
            r#"{"base":"USD","rates":{"USD":1,"EUR":0.9,"RUB":90.0}}"#,
        );
        let (fallback_url, h2) = serve_once(
            "200 OK",
            r#"{"date":"2024-01-01","usd":{"usd":1,"eur":0.9,"rub":90.0}}"#,
        );

        let a = ExchangeRateApiSource::new(client(), &primary_url)
            .fetch_rates()
            .await
            .unwrap();
        let b = CurrencyApiSource::new(client(), &fallback_url)
            .fetch_rates()
            .await
            .unwrap();
        assert_eq!(a, b);
        h1.join().unwrap();
        h2.join().unwrap();
    }

    #[tokio::test]
    async fn invalid_json_is_unavailable() {
        let (url, handle) = serve_once("200 OK", "<html>oops</html>");
        let err = ExchangeRateApiSource::new(client(), &url)
            .fetch_rates()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable(_)));
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = CurrencyApiSource::new(client(), &format!("http://{addr}/usd.json"))
            .fetch_rates()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn slow_source_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(1500));
            drop(stream);
        });

        let http = http_client(Duration::from_millis(300)).unwrap();
        let err = ExchangeRateApiSource::new(http, &format!("http://{addr}/latest"))
            .fetch_rates()
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Timeout("exchangerate-api".to_string()));
        handle.join().unwrap();
    }

    #[test]
    fn fetcher_builds_from_config() {
        let cfg = Config::from_lookup(|k| (k == "BOT_TOKEN").then(|| "t".to_string())).unwrap();
        assert!(fetcher_from_config(&cfg).is_ok());
    }
}
