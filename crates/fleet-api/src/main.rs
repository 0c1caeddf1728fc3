//! Alpha Fleet Board API server.

use fleet_api::auth::AdminGate;
use fleet_api::server::{self, AppState};
use fleet_engine::{BoardEngine, EngineConfig};
use fleet_persist::JsonFileBackend;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let data_file = std::env::var("FLEET_DATA_FILE").unwrap_or_else(|_| "data.json".to_string());
    let backend = Arc::new(JsonFileBackend::new(&data_file));
    let engine = Arc::new(BoardEngine::new(backend, EngineConfig::default()));
    engine.load().await;

    let _sweeper = fleet_sweeper::spawn_auto_release(Arc::clone(&engine), SWEEP_INTERVAL);

    let state = Arc::new(AppState {
        engine,
        gate: AdminGate::from_env(),
    });
    let app = server::router(state);
    let addr: SocketAddr = std::env::var("FLEET_LISTEN")
        .unwrap_or_else(|_| "0.0.0.0:7000".to_string())
        .parse()?;
    tracing::info!(%addr, data_file, "fleet board API listening");
    axum::serve(
        tokio::net::TcpListener::bind(addr).await?,
        app.into_make_service(),
    )
    .await?;
    Ok(())
}
