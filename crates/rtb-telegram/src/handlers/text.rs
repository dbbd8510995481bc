use std::sync::Arc;

use teloxide::prelude::*;

use rtb_core::{domain::ChatId, messaging::types::InboundEvent};

use crate::router::AppState;

/// Free text is treated as an arithmetic expression.
pub async fn handle_text(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let text = msg.text().unwrap_or_default().to_string();

    let reply = super::respond(&state, chat_id, InboundEvent::Text { text }).await;
    super::send(&state, chat_id, &reply).await;
    Ok(())
}
