//! Quaerix API server.
//!
//! Run with: cargo run -p quaerix-web

use quaerix_db::Database;
use quaerix_kg::KgClient;
use quaerix_queue::InProcessQueue;
use quaerix_web::config::Config;
use quaerix_web::jobs::KgJobRunner;
use quaerix_web::router::build_router;
use quaerix_web::state::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;

    let db = Database::connect(&config.database_url, config.max_connections).await?;
    db.initialize().await?;
    info!(url = %config.database_url, "store ready");

    let kg = KgClient::new(config.kg_url.clone());
    let runner = Arc::new(KgJobRunner::new(kg.clone()));
    let queue = Arc::new(InProcessQueue::new(config.queue_config(), runner));
    info!(
        answer_workers = config.answer_workers,
        update_workers = config.update_workers,
        "job queue ready"
    );

    let state = AppState::new(db, queue, kg);
    let app = build_router(state);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
