//! qrbot - Telegram bot that turns URLs into QR codes
//!
//! Long-polls the Bot API, classifies updates into events, and routes
//! them through a per-chat conversation state machine. Rendered QR codes
//! are cached so identical requests never re-encode.

mod cache;
mod ingest;
mod qr;
mod runtime;
mod size;
mod state_machine;
mod telegram;
mod url;

use cache::ArtifactCache;
use runtime::{BotRuntime, QrGenerator, TelegramResponder};
use std::sync::Arc;
use std::time::Duration;
use telegram::TelegramClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_MAX_BYTES: usize = 32 * 1024 * 1024;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 15;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qrbot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Configuration
    let token = std::env::var("QRBOT_TOKEN")
        .map_err(|_| "QRBOT_TOKEN must be set to a Telegram bot token")?;
    let poll_timeout_secs = env_or("QRBOT_POLL_TIMEOUT_SECS", DEFAULT_POLL_TIMEOUT_SECS);
    let cache_max_bytes = env_or("QRBOT_CACHE_MAX_BYTES", DEFAULT_CACHE_MAX_BYTES);
    let generation_timeout = Duration::from_secs(env_or(
        "QRBOT_GENERATION_TIMEOUT_SECS",
        DEFAULT_GENERATION_TIMEOUT_SECS,
    ));

    let client = Arc::new(TelegramClient::new(&token));
    let cache = Arc::new(ArtifactCache::new(cache_max_bytes));
    let bot = BotRuntime::new(
        TelegramResponder::new(Arc::clone(&client)),
        QrGenerator::new(generation_timeout),
        cache,
    );

    tracing::info!(
        poll_timeout_secs,
        cache_max_bytes,
        generation_timeout_secs = generation_timeout.as_secs(),
        "qrbot starting"
    );

    let mut offset: i64 = 0;
    loop {
        let updates = match client.get_updates(offset, poll_timeout_secs).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, backing off");
                tokio::time::sleep(Duration::from_secs(2)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            // Ack button presses so clients stop their spinners, even for
            // payloads the state machine will reject.
            if let Some(callback) = &update.callback_query {
                if let Err(e) = client.answer_callback_query(&callback.id).await {
                    tracing::warn!(error = %e, "answerCallbackQuery failed");
                }
            }

            if let Some(inbound) = ingest::classify_update(update) {
                bot.dispatch(inbound.chat_id, inbound.event).await;
            }
        }
    }
}
