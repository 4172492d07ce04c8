use crate::config::Config;
use crate::ledger::{AddressValidator, TransactionSyncer};
use crate::notifier::ChangeNotifier;
use crate::search::{FolderIndex, FolderIndexer, FolderSearcher};
use crate::tasks::TaskQueue;
use sqlx::SqlitePool;

pub struct AppState {
    pub config: Config,
    pub db_pool: SqlitePool,
    pub validator: AddressValidator,
    pub syncer: TransactionSyncer,
    pub index: FolderIndex,
    pub indexer: FolderIndexer,
    pub searcher: FolderSearcher,
    pub notifier: ChangeNotifier,
}

impl AppState {
    pub fn new(config: Config, db_pool: SqlitePool, validator: AddressValidator, queue: TaskQueue) -> Self {
        let index = FolderIndex::new(db_pool.clone());

        Self {
            config,
            syncer: TransactionSyncer::new(db_pool.clone()),
            indexer: FolderIndexer::new(db_pool.clone(), index.clone()),
            searcher: FolderSearcher::new(db_pool.clone(), index.clone()),
            notifier: ChangeNotifier::new(queue),
            index,
            validator,
            db_pool,
        }
    }
}
