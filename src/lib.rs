pub mod api;
pub mod config;
pub mod db;
pub mod ledger;
pub mod models;
pub mod notifier;
pub mod search;
pub mod service;
pub mod state;
pub mod tasks;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::response::ApiResponse;
pub use api::route::create_router;
pub use config::Config;
pub use db::connection;
pub use ledger::{AddressValidator, TransactionSyncer};
pub use models::{Address, Folder, Transaction};
pub use notifier::ChangeNotifier;
pub use state::AppState;
pub use tasks::{Task, TaskQueue, WorkerPool};
