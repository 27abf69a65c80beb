use std::sync::Arc;

use anyhow::Context;

use hwb_core::{
    config::Config,
    dates::parse_start_date,
    homework::VerdictTable,
    messaging::port::MessagingPort,
    notifier::Notifier,
    tracker::{Tracker, TrackerHandle, TRACKING_STOPPED},
};
use hwb_practicum::PracticumClient;
use hwb_telegram::TelegramMessenger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hwb_core::logging::init("hwb")?;

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("{e}");
            return Err(e.into());
        }
    };

    // First argument: start date (epoch seconds or `YYYY-MM-DD HH:MM:SS`); none means 0.
    let from_date = match std::env::args().nth(1) {
        Some(arg) => parse_start_date(&arg).context("bad start date")?,
        None => 0,
    };

    let source = Arc::new(PracticumClient::from_config(&cfg)?);
    let telegram = TelegramMessenger::from_token(cfg.telegram_token.clone());
    if let Some(name) = telegram.username().await {
        tracing::info!("hwb started: @{name}");
    }
    tracing::info!(endpoint = source.endpoint(), chat_id = cfg.telegram_chat_id.0, from_date);

    let messenger: Arc<dyn MessagingPort> = Arc::new(telegram);
    let notifier = Notifier::new(messenger, cfg.telegram_chat_id);
    let tracker = Tracker::new(
        source,
        notifier.clone(),
        Arc::new(VerdictTable::default()),
        cfg.retry_period,
    );

    let handle = TrackerHandle::new(tracker);
    handle.start(from_date).await;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    if handle.stop().await {
        notifier.notify(TRACKING_STOPPED).await;
    }
    handle.join().await;

    Ok(())
}
