use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use taskflow_api::config::AppConfig;
use taskflow_api::state::AppState;
use taskflow_api::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so `cargo run` picks up JWT_SECRET, PORT, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let default_filter = if config.is_development() {
        "taskflow_api=debug,tower_http=info"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!(
        environment = config.environment.as_str(),
        storage = config.storage.mode.as_str(),
        "starting TaskFlow API"
    );

    let store = MemoryStore::new(config.security.bcrypt_cost);
    if config.storage.seed_demo_data {
        store.seed_demo_data().await.context("failed to seed demo data")?;
    }

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, Arc::new(store)).context("failed to initialise session tokens")?;
    let app = taskflow_api::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("TaskFlow API listening on http://{}", bind_addr);
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
