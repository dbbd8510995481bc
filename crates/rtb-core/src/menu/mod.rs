//! Inline-keyboard navigation.
//!
//! The whole navigation state lives in the callback payload: an [`Action`]
//! encodes its target [`Screen`], so the server keeps no per-user session.
//! Each screen's keyboard comes from a static layout table.

mod machine;
pub mod render;

pub use machine::MenuMachine;
pub(crate) use machine::render_unavailable;

use crate::{market::catalog, messaging::types::Button};

/// Telegram limits callback payloads to 64 bytes.
pub const MAX_CALLBACK_LEN: usize = 64;
const MAX_ID_LEN: usize = 40;
const DETAIL_BUTTONS_PER_ROW: usize = 4;

/// A renderable navigation state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    CryptoList,
    CurrencyList,
    Help,
    InstrumentDetail(String),
    /// A data screen that could not be loaded; offers a retry of `retry`.
    Unavailable { retry: Box<Screen> },
}

/// A navigation action carried by a button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenCrypto,
    OpenCurrency,
    OpenHelp,
    OpenDetail(String),
    Refresh(Screen),
    Back,
}

#[derive(Clone, Copy, Debug)]
enum Slot {
    OpenCrypto,
    OpenCurrency,
    OpenHelp,
    /// Expands into one `OpenDetail` per catalog instrument.
    Details,
    Refresh,
    Back,
}

const MAIN_MENU_LAYOUT: &[&[Slot]] = &[&[Slot::OpenCrypto, Slot::OpenCurrency], &[Slot::OpenHelp]];
const CRYPTO_LIST_LAYOUT: &[&[Slot]] = &[&[Slot::Details], &[Slot::Refresh], &[Slot::Back]];
const CURRENCY_LIST_LAYOUT: &[&[Slot]] = &[&[Slot::Refresh], &[Slot::Back]];
const HELP_LAYOUT: &[&[Slot]] = &[&[Slot::Back]];
const DETAIL_LAYOUT: &[&[Slot]] = &[&[Slot::Refresh], &[Slot::OpenCrypto, Slot::Back]];
const UNAVAILABLE_LAYOUT: &[&[Slot]] = &[&[Slot::Refresh], &[Slot::Back]];

impl Screen {
    fn layout(&self) -> &'static [&'static [Slot]] {
        match self {
            Screen::MainMenu => MAIN_MENU_LAYOUT,
            Screen::CryptoList => CRYPTO_LIST_LAYOUT,
            Screen::CurrencyList => CURRENCY_LIST_LAYOUT,
            Screen::Help => HELP_LAYOUT,
            Screen::InstrumentDetail(_) => DETAIL_LAYOUT,
            Screen::Unavailable { .. } => UNAVAILABLE_LAYOUT,
        }
    }

    /// Whether rendering this screen needs a live fetch.
    pub fn needs_data(&self) -> bool {
        match self {
            Screen::CryptoList | Screen::CurrencyList | Screen::InstrumentDetail(_) => true,
            Screen::Unavailable { retry } => retry.needs_data(),
            Screen::MainMenu | Screen::Help => false,
        }
    }

    /// Actions offered from this screen, laid out in keyboard rows.
    pub fn actions(&self) -> Vec<Vec<Action>> {
        let mut rows = Vec::new();
        for row in self.layout() {
            let mut current = Vec::new();
            for slot in row.iter() {
                match slot {
                    Slot::OpenCrypto => current.push(Action::OpenCrypto),
                    Slot::OpenCurrency => current.push(Action::OpenCurrency),
                    Slot::OpenHelp => current.push(Action::OpenHelp),
                    Slot::Refresh => current.push(Action::refresh(self)),
                    Slot::Back => current.push(Action::Back),
                    Slot::Details => {
                        let details: Vec<Action> = catalog::instrument_ids()
                            .map(|id| Action::OpenDetail(id.to_string()))
                            .collect();
                        for chunk in details.chunks(DETAIL_BUTTONS_PER_ROW) {
                            rows.push(chunk.to_vec());
                        }
                    }
                }
            }
            if !current.is_empty() {
                rows.push(current);
            }
        }
        rows
    }

    /// Keyboard rows ready for the transport.
    pub fn keyboard(&self) -> Vec<Vec<Button>> {
        self.actions()
            .into_iter()
            .map(|row| row.iter().map(Action::button).collect())
            .collect()
    }

    /// Stable payload key, used inside `refresh:` actions.
    pub fn key(&self) -> String {
        match self {
            Screen::MainMenu => "main".to_string(),
            Screen::CryptoList => "crypto".to_string(),
            Screen::CurrencyList => "currency".to_string(),
            Screen::Help => "help".to_string(),
            Screen::InstrumentDetail(id) => format!("detail:{id}"),
            Screen::Unavailable { retry } => retry.key(),
        }
    }

    pub fn from_key(key: &str) -> Option<Screen> {
        match key {
            "main" => Some(Screen::MainMenu),
            "crypto" => Some(Screen::CryptoList),
            "currency" => Some(Screen::CurrencyList),
            "help" => Some(Screen::Help),
            _ => {
                let id = key.strip_prefix("detail:")?;
                is_valid_id(id).then(|| Screen::InstrumentDetail(id.to_string()))
            }
        }
    }
}

impl Action {
    /// Refresh of `screen`; an unavailable screen refreshes the one it replaced.
    pub fn refresh(screen: &Screen) -> Action {
        match screen {
            Screen::Unavailable { retry } => Action::Refresh((**retry).clone()),
            other => Action::Refresh(other.clone()),
        }
    }

    /// The screen this action leads to.
    pub fn target(&self) -> Screen {
        match self {
            Action::OpenCrypto => Screen::CryptoList,
            Action::OpenCurrency => Screen::CurrencyList,
            Action::OpenHelp => Screen::Help,
            Action::OpenDetail(id) => Screen::InstrumentDetail(id.clone()),
            Action::Refresh(screen) => screen.clone(),
            Action::Back => Screen::MainMenu,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Action::OpenCrypto => "open_crypto".to_string(),
            Action::OpenCurrency => "open_currency".to_string(),
            Action::OpenHelp => "open_help".to_string(),
            Action::OpenDetail(id) => format!("open_detail:{id}"),
            Action::Refresh(screen) => format!("refresh:{}", screen.key()),
            Action::Back => "back".to_string(),
        }
    }

    /// Parse a callback payload. Unknown or oversized payloads yield `None`.
    pub fn decode(data: &str) -> Option<Action> {
        let data = data.trim();
        if data.is_empty() || data.len() > MAX_CALLBACK_LEN {
            return None;
        }
        match data {
            "open_crypto" | "crypto" => Some(Action::OpenCrypto),
            "open_currency" | "currency" => Some(Action::OpenCurrency),
            "open_help" | "help" => Some(Action::OpenHelp),
            "back" | "main_menu" | "menu" => Some(Action::Back),
            _ => {
                if let Some(id) = data.strip_prefix("open_detail:") {
                    return is_valid_id(id).then(|| Action::OpenDetail(id.to_string()));
                }
                let key = data.strip_prefix("refresh:")?;
                Screen::from_key(key).map(Action::Refresh)
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Action::OpenCrypto => "💰 Crypto".to_string(),
            Action::OpenCurrency => "💵 Currencies".to_string(),
            Action::OpenHelp => "❓ Help".to_string(),
            Action::OpenDetail(id) => catalog::instrument(id)
                .map(|i| i.button_label())
                .unwrap_or_else(|| id.to_uppercase()),
            Action::Refresh(_) => "🔄 Refresh".to_string(),
            Action::Back => "◀️ Back".to_string(),
        }
    }

    pub fn button(&self) -> Button {
        Button {
            label: self.label(),
            action: self.encode(),
        }
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}
