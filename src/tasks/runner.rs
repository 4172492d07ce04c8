use super::Task;
use crate::ledger::client::LedgerError;
use crate::ledger::polling::refresh_address;
use crate::ledger::sync::SyncError;
use crate::state::AppState;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Index error: {0}")]
    Index(#[source] sqlx::Error),
}

pub async fn run_task(state: &AppState, task: Task) -> Result<(), TaskError> {
    debug!("Running {} task", task.kind());

    match task {
        Task::RefreshAddress { address } => {
            refresh_address(state, &address).await?;
        }
        Task::SyncTransactions {
            address,
            transactions,
        } => {
            state.syncer.sync(&address, &transactions).await?;
        }
        Task::UpsertFolderDocument { folder_id } => {
            state.indexer.upsert(folder_id).await.map_err(TaskError::Index)?;
        }
        Task::DeleteFolderDocument { folder_id } => {
            state.indexer.delete(folder_id).await.map_err(TaskError::Index)?;
        }
    }

    Ok(())
}
