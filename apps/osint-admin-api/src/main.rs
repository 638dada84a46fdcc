use anyhow::Context;
use osint_admin_api::{AppState, config::ApiConfig, router};
use osint_admin_core::{AdminGate, AdminService, EntitlementStore, PgStore};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "osint_admin_api=info,osint_admin_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::load()?;
    let gate = AdminGate::from_config(&config.admin_user_ids).context("Invalid ADMIN_USER_IDS")?;
    tracing::info!("Admin API starting with {} admin(s)", gate.admin_count());

    let pool = osint_admin_db::init_db(&config.database_url, config.database_max_connections).await?;
    let store: Arc<dyn EntitlementStore> = Arc::new(PgStore::new(pool));
    let service = AdminService::new(gate, store, config.pricing());
    let app = router(AppState::new(service, config.admin_api_key.as_str()));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Admin API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Admin API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
