use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use rtb_core::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::types::InboundEvent,
};

use crate::router::AppState;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let data = q.data.clone().unwrap_or_default();

    // Always answer first so the client stops its spinner.
    if let Err(e) = state.messenger.answer_callback_query(&cb_id, None).await {
        warn!(error = %e, "failed to answer callback query");
    }

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    if data.is_empty() {
        return Ok(());
    }

    let chat_id = ChatId(message.chat.id.0);
    let target = MessageRef {
        chat_id,
        message_id: MessageId(message.id.0),
    };

    let reply = super::respond(&state, chat_id, InboundEvent::Callback { action: data }).await;

    if !state.messenger.capabilities().supports_edit {
        super::send(&state, chat_id, &reply).await;
        return Ok(());
    }

    // Menus update in place; fall back to a new message when the old one
    // can no longer be edited.
    if let Err(e) = state.messenger.edit_reply(target, &reply).await {
        warn!(chat_id = chat_id.0, error = %e, "edit failed, sending new message");
        super::send(&state, chat_id, &reply).await;
    }

    Ok(())
}
