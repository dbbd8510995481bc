//! Event → reply dispatch.
//!
//! [`BotService`] is the only entry point the transport adapter calls. It
//! closes over the injected fetcher and never fails: every event, including
//! unknown commands and stale callbacks, produces a [`Reply`].

use tracing::{info, warn};

use crate::{
    calc,
    errors::FetchError,
    formatting::{escape_html, truncate_chars},
    market::QuoteFetcher,
    menu::{render, render_unavailable, Action, MenuMachine, Screen},
    messaging::types::{InboundEvent, Reply},
};

const ECHO_MAX_CHARS: usize = 100;

/// Commands the bot understands, as registered with the transport.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "main menu"),
    ("crypto", "crypto prices"),
    ("currency", "exchange rates"),
    ("btc", "Bitcoin only"),
    ("eth", "Ethereum only"),
    ("usd", "US dollar to ruble"),
    ("calc", "evaluate an arithmetic expression"),
    ("help", "help"),
];

#[derive(Clone)]
pub struct BotService {
    menu: MenuMachine,
}

impl BotService {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self {
            menu: MenuMachine::new(fetcher),
        }
    }

    pub async fn handle(&self, event: InboundEvent) -> Reply {
        match event {
            InboundEvent::Command {
                name,
                args,
                user_display_name,
            } => self.handle_command(&name, &args, &user_display_name).await,
            InboundEvent::Callback { action } => self.handle_callback(&action).await,
            InboundEvent::Text { text } => calculate(&text),
        }
    }

    /// Whether handling `event` involves a network round trip (worth a typing
    /// indicator).
    pub fn is_slow(&self, event: &InboundEvent) -> bool {
        match event {
            InboundEvent::Command { name, .. } => {
                command_screen(name).is_some_and(|s| s.needs_data()) || name == "usd"
            }
            InboundEvent::Callback { action } => {
                Action::decode(action).is_some_and(|a| a.target().needs_data())
            }
            InboundEvent::Text { .. } => false,
        }
    }

    async fn handle_command(&self, name: &str, args: &str, user_display_name: &str) -> Reply {
        info!(command = name, "command received");

        if let Some(screen) = command_screen(name) {
            return self.menu.render(screen).await;
        }

        match name {
            "start" => Reply::text(render::greeting(user_display_name))
                .with_keyboard(Screen::MainMenu.keyboard()),
            "usd" => self.usd().await,
            "calc" => {
                if args.trim().is_empty() {
                    Reply::text("🧮 Usage: <code>/calc (10+5)*2</code>")
                } else {
                    calculate(args)
                }
            }
            _ => Reply::text(format!(
                "🤷 Unknown command <code>/{}</code>. See /help.",
                escape_html(&truncate_chars(name, ECHO_MAX_CHARS))
            )),
        }
    }

    async fn handle_callback(&self, data: &str) -> Reply {
        match Action::decode(data) {
            Some(action) => {
                info!(action = %action.encode(), "callback received");
                self.menu.render(action.target()).await
            }
            None => {
                warn!(payload = %truncate_chars(data, ECHO_MAX_CHARS), "unknown callback payload");
                self.menu.render(Screen::MainMenu).await
            }
        }
    }

    async fn usd(&self) -> Reply {
        let result = self.menu.fetcher().fetch_rates().await;
        let card = result.and_then(|rates| {
            render::usd_card(&rates).ok_or_else(|| {
                FetchError::SourceUnavailable("no local currency rate in response".to_string())
            })
        });
        match card {
            Ok(text) => Reply::text(text).with_keyboard(vec![vec![
                Action::OpenCurrency.button(),
                Action::Back.button(),
            ]]),
            Err(err) => {
                warn!(error = %err, "usd card unavailable");
                render_unavailable(Screen::CurrencyList, &err)
            }
        }
    }
}

/// Commands that map directly onto a menu screen.
fn command_screen(name: &str) -> Option<Screen> {
    match name {
        "menu" => Some(Screen::MainMenu),
        "help" => Some(Screen::Help),
        "crypto" => Some(Screen::CryptoList),
        "currency" | "rates" => Some(Screen::CurrencyList),
        "btc" => Some(Screen::InstrumentDetail("bitcoin".to_string())),
        "eth" => Some(Screen::InstrumentDetail("ethereum".to_string())),
        _ => None,
    }
}

/// Evaluate user text and render either the result or the matching error.
pub fn calculate(input: &str) -> Reply {
    match calc::evaluate(input) {
        Ok(value) => Reply::text(format!(
            "🧮 <code>{}</code> = <b>{}</b>",
            escape_html(&truncate_chars(input.trim(), ECHO_MAX_CHARS)),
            calc::format_number(value)
        )),
        Err(err) => Reply::text(err.user_message()),
    }
}
