//! Screen text builders. Pure functions over already-fetched data.

use crate::{
    errors::FetchError,
    formatting::escape_html,
    market::{
        catalog::{self, CURRENCIES, INSTRUMENTS, LOCAL_CURRENCY},
        format::{format_change, format_grouped, format_market_cap, format_price, format_rate},
        Quote, QuoteResult, RateTable, BASE_CURRENCY,
    },
    menu::Screen,
};

const SEPARATOR: &str = "━━━━━━━━━━━━━━━";

/// `/start` greeting shown above the main menu.
pub fn greeting(user_display_name: &str) -> String {
    let name = user_display_name.trim();
    let name = if name.is_empty() { "there" } else { name };
    format!(
        "👋 Hi, {}!\n\n\
I track crypto and fiat exchange rates 📊 and can also do quick maths: \
just send me something like <code>2+2*3</code>.\n\n\
💰 Crypto: Bitcoin, Ethereum, Solana and more\n\
💵 Currencies: USD, EUR, GBP, CNY and more\n\n\
Pick what to show:",
        escape_html(name)
    )
}

pub fn main_menu() -> String {
    "📊 <b>Main menu</b>\n\nPick what to show:".to_string()
}

pub fn help() -> String {
    let coins = INSTRUMENTS
        .iter()
        .map(|i| format!("• {} ({})", i.name, i.ticker))
        .collect::<Vec<_>>()
        .join("\n");
    let currencies = CURRENCIES
        .iter()
        .map(|c| c.code)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "📚 <b>Help</b>\n\n\
🔹 Commands:\n\
/start - main menu\n\
/crypto - crypto prices\n\
/currency - exchange rates\n\
/btc - Bitcoin only\n\
/eth - Ethereum only\n\
/usd - US dollar to ruble\n\
/calc &lt;expression&gt; - calculator\n\
/help - this help\n\n\
🔹 Crypto:\n{coins}\n\n\
🔹 Currencies:\n{currencies}\n\n\
🧮 Any message like <code>(10+5)*2</code> is evaluated as arithmetic.\n\n\
Data is fetched live on every request 🔄"
    )
}

/// Catalog instruments in catalog order; ids missing from `quotes` are skipped.
pub fn crypto_list(quotes: &QuoteResult, updated: &str) -> String {
    let mut out = String::from("💰 <b>CRYPTO</b>\n\n");
    for inst in INSTRUMENTS {
        let Some(q) = quotes.get(inst.id) else {
            continue;
        };
        out.push_str(&format!("{}\n💵 {}\n", inst.title(), format_price(q.price)));
        if let Some(change) = q.change_24h {
            out.push_str(&format!("📊 24h: {}\n", format_change(change)));
        }
        out.push('\n');
    }
    out.push_str(&footer(updated));
    out
}

/// Tracked currencies per 1 USD, plus the local-currency summary.
pub fn currency_list(rates: &RateTable, updated: &str) -> String {
    let mut out = format!("💵 <b>EXCHANGE RATES</b>\n\nPer 1 {BASE_CURRENCY}:\n\n");
    for c in CURRENCIES {
        let Some(rate) = rates.get(c.code) else {
            continue;
        };
        out.push_str(&format!(
            "{} {}\n💰 {} {}\n\n",
            c.flag,
            c.name,
            format_rate(rate),
            c.code
        ));
    }

    if let Some(local) = rates.get(LOCAL_CURRENCY) {
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(&format!(
            "<b>1 {BASE_CURRENCY} = {} {LOCAL_CURRENCY}</b>\n",
            format_rate(local)
        ));
        if let Some(eur_local) = rates.cross("EUR", LOCAL_CURRENCY) {
            out.push_str(&format!(
                "<b>1 EUR = {} {LOCAL_CURRENCY}</b>\n",
                format_rate(eur_local)
            ));
        }
        out.push('\n');
    }

    out.push_str(&footer(updated));
    out
}

/// Single-instrument card: USD price, local price, 24h change, market cap.
pub fn instrument_detail(id: &str, quote: &Quote, updated: &str) -> String {
    let heading = match catalog::instrument(id) {
        Some(i) => format!("{} <b>{} ({})</b>", i.glyph, i.name.to_uppercase(), i.ticker),
        None => format!("<b>{}</b>", escape_html(&id.to_uppercase())),
    };

    let mut out = format!("{heading}\n\n💵 USD: {}\n", format_price(quote.price));
    if let Some(local) = quote.converted.get(&LOCAL_CURRENCY.to_lowercase()) {
        out.push_str(&format!(
            "🇷🇺 {LOCAL_CURRENCY}: {} ₽\n",
            format_grouped(*local, 0)
        ));
    }
    if let Some(change) = quote.change_24h {
        out.push_str(&format!("\n📊 24h change:\n{}\n", format_change(change)));
    }
    if let Some(cap) = quote.market_cap {
        out.push_str(&format!("\n💎 Market cap:\n{}\n", format_market_cap(cap)));
    }
    out.push('\n');
    out.push_str(&footer(updated));
    out
}

/// `/usd` card: USD ↔ local currency. `None` when the local rate is missing.
pub fn usd_card(rates: &RateTable) -> Option<String> {
    let local = rates.get(LOCAL_CURRENCY)?;
    Some(format!(
        "💵 <b>US DOLLAR</b>\n\n\
1 {BASE_CURRENCY} = {} {LOCAL_CURRENCY}\n\
1 {LOCAL_CURRENCY} = {:.4} {BASE_CURRENCY}\n\n\
100 {BASE_CURRENCY} = {} {LOCAL_CURRENCY}\n\
1000 {BASE_CURRENCY} = {} {LOCAL_CURRENCY}",
        format_rate(local),
        1.0 / local,
        format_grouped(local * 100.0, 2),
        format_grouped(local * 1000.0, 2),
    ))
}

/// Error screen shown instead of `retry` when its data could not be loaded.
pub fn unavailable(retry: &Screen, err: &FetchError) -> String {
    let what = match retry {
        Screen::CryptoList => "crypto prices".to_string(),
        Screen::CurrencyList => "exchange rates".to_string(),
        Screen::InstrumentDetail(id) => catalog::instrument(id)
            .map(|i| format!("{} data", i.name))
            .unwrap_or_else(|| format!("{} data", escape_html(id))),
        Screen::MainMenu | Screen::Help | Screen::Unavailable { .. } => "data".to_string(),
    };
    format!("{}\n\n<i>Could not load {what}.</i>", err.user_message())
}

fn footer(updated: &str) -> String {
    format!("🕐 Updated: {updated}")
}
