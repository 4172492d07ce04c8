// Recreate the folder search index from the folder table.

use ledger_watch::{
    config::Config,
    db,
    search::{FolderIndex, FolderIndexer},
};
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
    let db_pool = db::connection::establish_connection(&config.database_url).await?;

    let indexer = FolderIndexer::new(db_pool.clone(), FolderIndex::new(db_pool));
    let indexed = indexer.rebuild().await?;
    println!("Folder index successfully rebuilt with {} documents", indexed);

    Ok(())
}
