use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info};

use pantry::bot::{self, BotState};
use pantry::config::AppConfig;
use pantry::db::{self, PgStore};
use pantry::localization;
use pantry::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format)?;

    info!("Starting Pantry Telegram Bot");

    localization::init_localization().context("Failed to load localization resources")?;

    let pool = db::connect(&config.database_url, config.db_max_connections).await?;
    db::init_database_schema(&pool).await?;

    let state = Arc::new(BotState::new(PgStore::new(pool.clone())));
    let bot = Bot::new(config.telegram_bot_token);

    tokio::spawn({
        let bot = bot.clone();
        let state = Arc::clone(&state);
        async move {
            if let Err(e) = bot::listen_for_changes(bot, pool, state).await {
                error!(error = %e, "Change listener stopped");
            }
        }
    });

    info!("Bot initialized, starting dispatcher");

    let handler = Update::filter_message().endpoint(bot::message_handler);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
