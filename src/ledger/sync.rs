use crate::db::{address, transaction};
use crate::ledger::models::RawTx;
use crate::models::Transaction;
use sqlx::SqlitePool;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Address not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Stores the transactions of a raw ledger payload under an existing address.
#[derive(Clone)]
pub struct TransactionSyncer {
    pool: SqlitePool,
}

impl TransactionSyncer {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts every transaction of `raw_transactions` that is not stored yet
    /// and returns how many were added. Stored rows are never modified, so
    /// repeating a sync is harmless.
    ///
    /// The hash pre-check only trims the insert; the `(address, hash)` key
    /// is what keeps concurrent syncs from duplicating rows.
    pub async fn sync(&self, address_key: &str, raw_transactions: &[RawTx]) -> Result<u64, SyncError> {
        if address::find_address(&self.pool, address_key).await?.is_none() {
            return Err(SyncError::NotFound(address_key.to_string()));
        }

        let mut known = transaction::existing_hashes(&self.pool, address_key).await?;
        let staged = stage_new(address_key, raw_transactions, &mut known);

        if staged.is_empty() {
            debug!("No new transactions for {}", address_key);
            return Ok(0);
        }

        let inserted = transaction::insert_transactions(&self.pool, &staged).await?;
        address::touch_address(&self.pool, address_key).await?;

        info!(
            "Stored {} new transactions for {} ({} staged)",
            inserted,
            address_key,
            staged.len()
        );

        Ok(inserted)
    }
}

/// Converts the raw entries whose hash is not in `known`, adding each staged
/// hash to `known` so a payload repeating a hash stages it once.
fn stage_new(address_key: &str, raw_transactions: &[RawTx], known: &mut HashSet<String>) -> Vec<Transaction> {
    let mut staged = Vec::new();

    for raw in raw_transactions {
        if known.contains(&raw.hash) {
            continue;
        }

        match raw.to_transaction(address_key) {
            Ok(transaction) => {
                known.insert(raw.hash.clone());
                staged.push(transaction);
            }
            Err(e) => warn!("Skipping transaction {} of {}: {}", raw.hash, address_key, e),
        }
    }

    staged
}
