// Set up logging
// Load configuration
// Create database connection pool
// Create shared state and the background queue
// Start background workers and the periodic refresh
// Start HTTP server

use ledger_watch::{
    api, config::Config, db, ledger, state::AppState, tasks::TaskQueue, tasks::WorkerPool,
    AddressValidator,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ledger-watch");

    let config = Config::from_env();
    if config.ledger_api_key.is_none() {
        tracing::warn!("ETHERSCAN_API_TOKEN is not set; address submissions will fail until it is");
    }

    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    tracing::info!("Database connection established");

    let validator = AddressValidator::new(&config)?;
    let (queue, receiver) = TaskQueue::channel(config.task_queue_capacity);
    let app_state = Arc::new(AppState::new(config.clone(), db_pool, validator, queue));

    let shutdown = CancellationToken::new();
    let workers = WorkerPool::spawn(app_state.clone(), receiver, config.worker_count, shutdown.clone());

    let refresh_handle = config.refresh_interval.map(|period| {
        let refresh_state = app_state.clone();
        let refresh_shutdown = shutdown.clone();
        tokio::spawn(async move {
            ledger::start_refresh_loop(refresh_state, period, refresh_shutdown).await;
        })
    });

    let app = api::create_router(app_state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting server on {}", addr);

    let server_shutdown = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => tracing::info!("Received Ctrl-C, shutting down"),
                _ = server_shutdown.cancelled() => {}
            }
        })
        .await?;

    shutdown.cancel();
    workers.join().await;
    if let Some(handle) = refresh_handle {
        let _ = handle.await;
    }

    tracing::info!("ledger-watch stopped");
    Ok(())
}
