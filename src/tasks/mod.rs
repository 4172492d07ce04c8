//! Background work: the task descriptors, the queue that accepts them and
//! the worker pool that runs them

pub mod runner;
pub mod worker_pool;

use crate::ledger::models::RawTx;
use thiserror::Error;
use tokio::sync::mpsc;

pub use runner::{run_task, TaskError};
pub use worker_pool::WorkerPool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Validate the address against the ledger, then store its transactions.
    RefreshAddress { address: String },
    /// Store an already fetched transaction list.
    SyncTransactions {
        address: String,
        transactions: Vec<RawTx>,
    },
    UpsertFolderDocument { folder_id: i64 },
    DeleteFolderDocument { folder_id: i64 },
}

impl Task {
    pub fn kind(&self) -> &'static str {
        match self {
            Task::RefreshAddress { .. } => "refresh_address",
            Task::SyncTransactions { .. } => "sync_transactions",
            Task::UpsertFolderDocument { .. } => "upsert_folder_document",
            Task::DeleteFolderDocument { .. } => "delete_folder_document",
        }
    }
}

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Task queue is closed, dropped {0} task")]
    Closed(&'static str),
}

/// Sending half of the background queue. Tasks run at most once each, in no
/// particular order relative to each other.
#[derive(Clone)]
pub struct TaskQueue {
    sender: mpsc::Sender<Task>,
}

impl TaskQueue {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Task>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Waits for queue space when the workers are behind.
    pub async fn enqueue(&self, task: Task) -> Result<(), QueueError> {
        let kind = task.kind();
        self.sender
            .send(task)
            .await
            .map_err(|_| QueueError::Closed(kind))
    }
}
