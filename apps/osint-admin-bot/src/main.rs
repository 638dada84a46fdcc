use anyhow::Context;
use osint_admin_bot::api_client::ApiClient;
use osint_admin_bot::config::{BotBackendKind, BotConfig};
use osint_admin_bot::{BotState, bot};
use osint_admin_core::{AdminBackend, AdminGate, AdminService, PgStore};
use std::sync::Arc;
use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osint_admin_bot=info,osint_admin_core=info,teloxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = BotConfig::load()?;
    tracing::info!("Starting admin bot...");

    let backend: Arc<dyn AdminBackend> = match config.bot_backend {
        BotBackendKind::Local => {
            let database_url = config.database_url.as_deref().context("DATABASE_URL must be set")?;
            let admin_ids = config.admin_user_ids.as_deref().context("ADMIN_USER_IDS must be set")?;
            let gate = AdminGate::from_config(admin_ids).context("Invalid ADMIN_USER_IDS")?;
            tracing::info!("Local backend with {} admin(s)", gate.admin_count());
            let pool = osint_admin_db::init_db(database_url, config.database_max_connections).await?;
            Arc::new(AdminService::new(gate, Arc::new(PgStore::new(pool)), config.pricing()))
        }
        BotBackendKind::Api => {
            let api_key = config.admin_api_key.as_deref().context("ADMIN_API_KEY must be set")?;
            let client = ApiClient::new(&config.api_base_url, api_key)?;
            tracing::info!("Forwarding admin commands to {}", client.base_url());
            Arc::new(client)
        }
    };

    let bot = Bot::new(&config.admin_bot_token);
    bot::run_bot(bot, BotState::new(backend), async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
    })
    .await;

    Ok(())
}
