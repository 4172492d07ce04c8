use super::{run_task, Task};
use crate::state::AppState;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct WorkerPool {
    workers: Vec<WorkerHandle>,
}

struct WorkerHandle {
    id: usize,
    handle: tokio::task::JoinHandle<()>,
}

impl WorkerPool {
    /// Starts `worker_count` workers draining `receiver` until `shutdown` is
    /// cancelled. Tasks still queued at that point are dropped.
    pub fn spawn(
        state: Arc<AppState>,
        receiver: mpsc::Receiver<Task>,
        worker_count: usize,
        shutdown: CancellationToken,
    ) -> Self {
        let receiver = Arc::new(Mutex::new(receiver));
        let worker_count = worker_count.max(1);

        let mut workers = Vec::with_capacity(worker_count);

        for id in 0..worker_count {
            let worker = Worker {
                id,
                state: state.clone(),
                receiver: receiver.clone(),
                shutdown: shutdown.clone(),
            };

            let handle = tokio::spawn(async move {
                worker.run().await;
            });

            workers.push(WorkerHandle { id, handle });
        }

        info!("Started {} background workers", worker_count);

        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Waits for every worker to exit.
    pub async fn join(self) {
        let results = futures::future::join_all(self.workers.into_iter().map(|worker| async move {
            (worker.id, worker.handle.await)
        }))
        .await;

        for (id, result) in results {
            if let Err(e) = result {
                error!("Worker {} terminated abnormally: {}", id, e);
            }
        }
    }
}

struct Worker {
    id: usize,
    state: Arc<AppState>,
    receiver: Arc<Mutex<mpsc::Receiver<Task>>>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(&self) {
        info!("Worker {} started", self.id);

        loop {
            let task = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                task = async { self.receiver.lock().await.recv().await } => match task {
                    Some(task) => task,
                    None => {
                        info!("Worker {} channel closed, shutting down", self.id);
                        break;
                    }
                },
            };

            let kind = task.kind();
            if let Err(e) = run_task(&self.state, task).await {
                error!("Worker {} failed to run {} task: {}", self.id, kind, e);
            }
        }

        info!("Worker {} shutting down", self.id);
    }
}
