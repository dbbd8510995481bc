//! Telegram adapter (teloxide).
//!
//! This crate implements the `rtb-core` MessagingPort over Telegram Bot API
//! and maps Telegram updates onto `InboundEvent`s.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{InlineKeyboardButton, InlineKeyboardMarkup, ParseMode},
    ApiError, RequestError,
};

use tokio::time::sleep;

pub mod handlers;
pub mod router;

use rtb_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{ChatAction, MessagingCapabilities, Reply},
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

/// Convert reply keyboard rows into Telegram inline markup.
pub fn to_markup(reply: &Reply) -> Option<InlineKeyboardMarkup> {
    if reply.keyboard.is_empty() {
        return None;
    }
    let rows: Vec<Vec<InlineKeyboardButton>> = reply
        .keyboard
        .iter()
        .map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.action.clone()))
                .collect()
        })
        .collect();
    Some(InlineKeyboardMarkup::new(rows))
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            supports_edit: true,
            supports_inline_keyboards: true,
            max_message_len: 4096,
        }
    }

    async fn send_reply(&self, chat_id: ChatId, reply: &Reply) -> Result<MessageRef> {
        let markup = to_markup(reply);
        let msg = self
            .with_retry(|| {
                let req = self
                    .bot
                    .send_message(Self::tg_chat(chat_id), reply.text.clone())
                    .parse_mode(ParseMode::Html);
                match markup.clone() {
                    Some(m) => req.reply_markup(m),
                    None => req,
                }
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn edit_reply(&self, msg: MessageRef, reply: &Reply) -> Result<()> {
        let markup = to_markup(reply);
        let res = self
            .with_retry(|| {
                let req = self
                    .bot
                    .edit_message_text(
                        Self::tg_chat(msg.chat_id),
                        Self::tg_msg_id(msg.message_id),
                        reply.text.clone(),
                    )
                    .parse_mode(ParseMode::Html);
                match markup.clone() {
                    Some(m) => req.reply_markup(m),
                    None => req,
                }
            })
            .await;

        match res {
            Ok(_) => Ok(()),
            // Refreshing an unchanged screen is not an error.
            Err(Error::External(s)) if is_not_modified(&s) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()> {
        let tg_action = match action {
            ChatAction::Typing => teloxide::types::ChatAction::Typing,
        };
        self.with_retry(|| self.bot.send_chat_action(Self::tg_chat(chat_id), tg_action))
            .await?;
        Ok(())
    }

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()> {
        self.with_retry(|| {
            let mut req = self.bot.answer_callback_query(callback_id.to_string());
            if let Some(t) = text {
                req = req.text(t.to_string());
            }
            req
        })
        .await?;
        Ok(())
    }
}

fn is_not_modified(err: &str) -> bool {
    err.contains(&RequestError::Api(ApiError::MessageNotModified).to_string())
}
