use crate::db::address;
use crate::ledger::client::AddressCheck;
use crate::state::AppState;
use crate::tasks::TaskError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Validates one stored address and stores any new transactions. Returns the
/// number of transactions added; an address the ledger refuses adds none.
pub async fn refresh_address(state: &AppState, address: &str) -> Result<u64, TaskError> {
    match state.validator.validate(address).await?.check() {
        AddressCheck::Valid(transactions) => Ok(state.syncer.sync(address, &transactions).await?),
        AddressCheck::MissingCredential => {
            warn!("Ledger API credential is not configured, {} not refreshed", address);
            Ok(0)
        }
        AddressCheck::InvalidAddress(text) => {
            warn!("Ledger rejected stored address {}: {}", address, text);
            Ok(0)
        }
        AddressCheck::ApiError { status, message } => {
            warn!(
                "Ledger refused to list {} (status={}, message={})",
                address, status, message
            );
            Ok(0)
        }
    }
}

/// Refreshes every stored address in turn. Failures are logged per address
/// and do not stop the sweep. Returns the number of transactions added.
pub async fn refresh_all(state: &AppState) -> Result<u64, TaskError> {
    if !state.validator.has_credential() {
        warn!("Ledger API credential is not configured, skipping refresh");
        return Ok(0);
    }

    let addresses = address::get_all_addresses(&state.db_pool)
        .await
        .map_err(|e| TaskError::Sync(e.into()))?;

    let mut total = 0;
    for addr in &addresses {
        match refresh_address(state, addr).await {
            Ok(added) => {
                info!("{} is successfully updated ({} new transactions)", addr, added);
                total += added;
            }
            Err(e) => error!("Error refreshing {}: {}", addr, e),
        }
    }

    info!("Refreshed {} addresses, {} new transactions", addresses.len(), total);
    Ok(total)
}

/// Runs `refresh_all` every `period` until `shutdown` is cancelled.
pub async fn start_refresh_loop(state: Arc<AppState>, period: Duration, shutdown: CancellationToken) {
    info!("Starting address refresh every {:?}", period);

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = refresh_all(&state).await {
                    error!("Error refreshing addresses: {}", e);
                }
            }
            _ = shutdown.cancelled() => {
                info!("Shutting down address refresh");
                break;
            }
        }
    }
}
