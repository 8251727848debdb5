use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cityinfo_api::config::{self, StoreBackend};
use cityinfo_api::database::{CityInfoStore, DatabaseManager, MemoryCityInfoStore, PgCityInfoStore};
use cityinfo_api::{app, is_development, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cityinfo_api=info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting City Info API in {:?} mode", config.environment);
    if is_development!() {
        tracing::warn!("Demo user store accepts any non-empty user name");
    }

    let store = build_store(&config.database).await?;
    let state = AppState::new(config.clone(), store);

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("City Info API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

async fn build_store(database: &config::DatabaseConfig) -> anyhow::Result<Arc<dyn CityInfoStore>> {
    match database.backend {
        StoreBackend::Memory => {
            tracing::info!("Using seeded in-memory store");
            Ok(Arc::new(MemoryCityInfoStore::seeded()))
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(database)
                .await
                .context("failed to connect to PostgreSQL")?;
            let store = PgCityInfoStore::new(pool);
            store.migrate().await.context("failed to prepare schema")?;
            tracing::info!("Using PostgreSQL store");
            Ok(Arc::new(store))
        }
    }
}
