pub mod client;
pub mod models;
pub mod polling;
pub mod rate_limit;
pub mod sync;

// Re-exports for convenience
pub use client::{AddressCheck, AddressValidator, LedgerError, Validation};
pub use models::{LedgerResponse, LedgerResult, RawTx};
pub use polling::{refresh_all, start_refresh_loop};
pub use rate_limit::Throttle;
pub use sync::{SyncError, TransactionSyncer};
