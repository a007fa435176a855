use fasting_log::config::{Settings, StoreSettings};
use fasting_log::store::{FileStore, SheetsStore};
use fasting_log::{router, AppState, FastingLog};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env()?;

    let log = match &settings.store {
        StoreSettings::Sheets(sheets) => {
            let store = Arc::new(SheetsStore::new(sheets)?);
            FastingLog::new(store.clone(), store)
        }
        StoreSettings::File(path) => {
            let store = Arc::new(FileStore::open(path.clone()).await?);
            FastingLog::new(store.clone(), store)
        }
    };

    if settings.api_key.is_none() {
        info!("API_KEY not set, /api routes are open");
    }
    let app = router(AppState::new(log, settings.api_key));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
