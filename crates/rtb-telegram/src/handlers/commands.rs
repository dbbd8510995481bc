use std::sync::Arc;

use teloxide::prelude::*;

use rtb_core::{domain::ChatId, messaging::types::InboundEvent};

use crate::router::AppState;

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

fn display_name(msg: &Message) -> String {
    msg.from()
        .map(|u| u.first_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "there".to_string())
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let (name, args) = parse_command(msg.text().unwrap_or_default());

    let event = InboundEvent::Command {
        name,
        args,
        user_display_name: display_name(&msg),
    };
    let reply = super::respond(&state, chat_id, event).await;
    super::send(&state, chat_id, &reply).await;
    Ok(())
}
