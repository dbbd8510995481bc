use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};
use tracing::{info, warn};

use rtb_core::{
    config::Config,
    messaging::port::MessagingPort,
    service::{BotService, COMMANDS},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BotService>,
    pub messenger: Arc<dyn MessagingPort>,
}

pub fn bot_commands() -> Vec<BotCommand> {
    COMMANDS
        .iter()
        .map(|(cmd, desc)| BotCommand::new(*cmd, *desc))
        .collect()
}

/// Long-poll Telegram until the process is stopped.
pub async fn run_polling(cfg: Arc<Config>, service: Arc<BotService>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.bot_token.clone());

    match bot.get_me().await {
        Ok(me) => info!(username = %me.username(), "bot started"),
        Err(e) => warn!(error = %e, "get_me failed"),
    }

    // Best-effort: the bot works without a registered command list.
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        warn!(error = %e, "failed to register command list");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState { service, messenger });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    info!("dispatcher stopped");
    Ok(())
}
