//! herald - standalone entry point.
//!
//! Runs the bot core without a platform adapter: outbound traffic goes
//! to the recording mock backend and the process idles until ctrl-c.
//! Real deployments embed the `herald` library crate behind an adapter
//! and feed [`Bot::handle`] from the platform's event stream.

use std::sync::Arc;

use herald::Bot;
use herald::config::Config;
use herald_platform::{Chat, MockChat};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        prefix = %config.bot.default_prefix,
        locale = %config.bot.default_locale,
        database = %config.database.path,
        "Starting herald"
    );

    // No adapter ships in this crate; the mock backend records outbound
    // traffic so the core can run and be poked at standalone.
    let chat: Arc<dyn Chat> = Arc::new(MockChat::new());
    info!("No platform adapter wired; using the recording mock backend");

    let bot = Bot::new(config, chat).await?;

    bot.spawn_queue();
    info!(pending = bot.queue().pending_len(), "Task queue started");

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");

    Ok(())
}
