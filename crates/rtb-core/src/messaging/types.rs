use crate::formatting::truncate_chars;

/// Inbound event as classified by the transport adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// `/name args`; `name` is lower-case without the leading slash or `@bot` suffix.
    Command {
        name: String,
        args: String,
        user_display_name: String,
    },
    /// Inline-keyboard button press carrying the opaque callback payload.
    Callback { action: String },
    /// Any other text message.
    Text { text: String },
}

/// One inline-keyboard button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    /// Callback payload round-tripped by the transport.
    pub action: String,
}

/// Rendered reply: Telegram-HTML text plus rows of buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Vec<Vec<Button>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Vec::new(),
        }
    }

    pub fn with_keyboard(mut self, keyboard: Vec<Vec<Button>>) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Adapt the reply to what the messenger can deliver.
    pub fn fit(mut self, caps: &MessagingCapabilities) -> Self {
        if !caps.supports_inline_keyboards {
            self.keyboard.clear();
        }
        if self.text.chars().count() > caps.max_message_len {
            self.text = truncate_chars(&self.text, caps.max_message_len.saturating_sub(3));
        }
        self
    }

    /// All callback payloads on the keyboard, row by row.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.keyboard.iter().flatten().map(|b| b.action.as_str())
    }
}

/// Outgoing "chat action" (typing indicator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_edit: bool,
    pub supports_inline_keyboards: bool,
    pub max_message_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(keyboards: bool, max: usize) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_edit: true,
            supports_inline_keyboards: keyboards,
            max_message_len: max,
        }
    }

    fn sample() -> Reply {
        Reply::text("hello world").with_keyboard(vec![vec![Button {
            label: "Back".to_string(),
            action: "back".to_string(),
        }]])
    }

    #[test]
    fn fit_keeps_reply_within_limits() {
        assert_eq!(sample().fit(&caps(true, 4096)), sample());
    }

    #[test]
    fn fit_truncates_long_text() {
        let fitted = sample().fit(&caps(true, 8));
        assert_eq!(fitted.text, "hello...");
        assert_eq!(fitted.keyboard.len(), 1);
    }

    #[test]
    fn fit_drops_keyboard_when_unsupported() {
        let fitted = sample().fit(&caps(false, 4096));
        assert!(fitted.keyboard.is_empty());
        assert_eq!(fitted.text, "hello world");
    }
}
