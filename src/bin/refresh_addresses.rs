// Update every stored address with its latest transactions, once.

use ledger_watch::{config::Config, db, ledger, state::AppState, tasks::TaskQueue, AddressValidator};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.ledger_api_key.is_none() {
        return Err("ETHERSCAN_API_TOKEN isn't provided".into());
    }

    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    let validator = AddressValidator::new(&config)?;
    // Syncs run inline here, nothing is queued
    let (queue, _receiver) = TaskQueue::channel(1);
    let state = AppState::new(config, db_pool, validator, queue);

    let added = ledger::refresh_all(&state).await?;
    println!("Stored {} new transactions", added);

    Ok(())
}
