//! Telegram update handlers.
//!
//! Each handler translates one update into an [`InboundEvent`], hands it to
//! the core [`BotService`](rtb_core::service::BotService) and delivers the
//! resulting reply through the messaging port.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::{debug, warn};

use rtb_core::{
    domain::ChatId,
    messaging::types::{ChatAction, InboundEvent, Reply},
};

use crate::router::AppState;

mod callback;
mod commands;
mod text;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = msg.chat.id.0, "ignoring non-text message");
        return Ok(());
    };

    if text.starts_with('/') {
        return commands::handle_command(msg.clone(), state).await;
    }

    text::handle_text(msg.clone(), state).await
}

/// Run `event` through the service, showing a typing indicator first when
/// the event needs a network round trip.
async fn respond(state: &AppState, chat_id: ChatId, event: InboundEvent) -> Reply {
    if state.service.is_slow(&event) {
        if let Err(e) = state
            .messenger
            .send_chat_action(chat_id, ChatAction::Typing)
            .await
        {
            warn!(chat_id = chat_id.0, error = %e, "typing indicator failed");
        }
    }
    let caps = state.messenger.capabilities();
    state.service.handle(event).await.fit(&caps)
}

async fn send(state: &AppState, chat_id: ChatId, reply: &Reply) {
    if let Err(e) = state.messenger.send_reply(chat_id, reply).await {
        warn!(chat_id = chat_id.0, error = %e, "failed to send reply");
    }
}
