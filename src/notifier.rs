// Called by the write paths after their change is committed. Every method
// only enqueues; none waits for the work to happen.

use crate::ledger::models::RawTx;
use crate::tasks::{Task, TaskQueue};
use tracing::{debug, error};

#[derive(Clone)]
pub struct ChangeNotifier {
    queue: TaskQueue,
}

impl ChangeNotifier {
    pub fn new(queue: TaskQueue) -> Self {
        Self { queue }
    }

    /// A new address row exists. With `prefetched` transactions (the caller
    /// already asked the ledger) only the sync is scheduled; otherwise the
    /// background task validates first.
    pub async fn address_created(&self, address: &str, prefetched: Option<Vec<RawTx>>) {
        let task = match prefetched {
            Some(transactions) => Task::SyncTransactions {
                address: address.to_string(),
                transactions,
            },
            None => Task::RefreshAddress {
                address: address.to_string(),
            },
        };

        self.dispatch(task).await;
    }

    /// Fresh ledger data for an address that was already stored.
    pub async fn transactions_fetched(&self, address: &str, transactions: Vec<RawTx>) {
        self.dispatch(Task::SyncTransactions {
            address: address.to_string(),
            transactions,
        })
        .await;
    }

    pub async fn folder_created(&self, folder_id: i64) {
        self.dispatch(Task::UpsertFolderDocument { folder_id }).await;
    }

    pub async fn folder_renamed(&self, folder_id: i64) {
        self.dispatch(Task::UpsertFolderDocument { folder_id }).await;
    }

    pub async fn folder_deleted(&self, folder_id: i64) {
        self.dispatch(Task::DeleteFolderDocument { folder_id }).await;
    }

    async fn dispatch(&self, task: Task) {
        let kind = task.kind();
        match self.queue.enqueue(task).await {
            Ok(()) => debug!("Enqueued {} task", kind),
            Err(e) => error!("{}", e),
        }
    }
}
