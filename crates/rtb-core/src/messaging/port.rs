use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{ChatAction, MessagingCapabilities, Reply},
    Result,
};

/// Cross-messenger outbound port.
///
/// Telegram is the only implementation; handlers talk to this trait so they
/// never build transport-specific markup themselves.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_reply(&self, chat_id: ChatId, reply: &Reply) -> Result<MessageRef>;
    async fn edit_reply(&self, msg: MessageRef, reply: &Reply) -> Result<()>;

    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;

    async fn answer_callback_query(&self, callback_id: &str, text: Option<&str>) -> Result<()>;
}
