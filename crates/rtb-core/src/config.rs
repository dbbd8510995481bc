use std::{
    env, fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::Path,
    time::Duration,
};

use crate::{errors::Error, Result};

pub const DEFAULT_CRYPTO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_RATES_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";
pub const DEFAULT_RATES_FALLBACK_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/usd.json";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const MAX_HTTP_TIMEOUT_SECS: u64 = 60;

/// Typed configuration for the bot process.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,

    // Quote providers
    pub http_timeout: Duration,
    pub crypto_api_url: String,
    pub rates_api_url: String,
    pub rates_fallback_url: String,

    // Liveness server (disabled when PORT is unset)
    pub health_addr: Option<SocketAddr>,
}

impl Config {
    /// Load from `.env` (if present) and the process environment.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bot_token = lookup("BOT_TOKEN")
            .and_then(non_empty)
            .or_else(|| lookup("TELEGRAM_BOT_TOKEN").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("BOT_TOKEN environment variable is required".to_string())
            })?;

        let timeout_secs = lookup("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS)
            .clamp(1, MAX_HTTP_TIMEOUT_SECS);

        let crypto_api_url = url_or_default(lookup("CRYPTO_API_URL"), DEFAULT_CRYPTO_API_URL);
        let rates_api_url = url_or_default(lookup("RATES_API_URL"), DEFAULT_RATES_API_URL);
        let rates_fallback_url =
            url_or_default(lookup("RATES_FALLBACK_URL"), DEFAULT_RATES_FALLBACK_URL);

        let health_addr = match lookup("PORT").and_then(non_empty) {
            Some(raw) => {
                let port = raw
                    .trim()
                    .parse::<u16>()
                    .map_err(|_| Error::Config(format!("PORT is not a valid port: {raw}")))?;
                let host = match lookup("HEALTH_HOST").and_then(non_empty) {
                    Some(h) => h.trim().parse::<IpAddr>().map_err(|_| {
                        Error::Config(format!("HEALTH_HOST is not an IP address: {h}"))
                    })?,
                    None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                };
                Some(SocketAddr::new(host, port))
            }
            None => None,
        };

        Ok(Self {
            bot_token,
            http_timeout: Duration::from_secs(timeout_secs),
            crypto_api_url,
            rates_api_url,
            rates_fallback_url,
            health_addr,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn url_or_default(v: Option<String>, default: &str) -> String {
    v.and_then(non_empty)
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
