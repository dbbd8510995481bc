use std::sync::Arc;

use tracing::info;

use rtb_core::{config::Config, service::BotService};

#[tokio::main]
async fn main() -> Result<(), rtb_core::Error> {
    rtb_core::logging::init("rtb")?;

    let cfg = Arc::new(Config::load()?);

    let fetcher = rtb_sources::fetcher_from_config(&cfg)?;
    let service = Arc::new(BotService::new(fetcher));

    if let Some(addr) = cfg.health_addr {
        rtb_health::spawn(addr);
    } else {
        info!("PORT not set, liveness server disabled");
    }

    rtb_telegram::router::run_polling(cfg, service)
        .await
        .map_err(|e| rtb_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
