use super::index::{FieldQuery, FolderIndex};
use super::keys::DocumentId;
use crate::db::folder;
use crate::models::Folder;
use sqlx::SqlitePool;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Free-text folder lookup. Visibility filtering is the caller's job.
#[derive(Clone)]
pub struct FolderSearcher {
    pool: SqlitePool,
    index: FolderIndex,
}

impl FolderSearcher {
    pub fn new(pool: SqlitePool, index: FolderIndex) -> Self {
        Self { pool, index }
    }

    /// Folders whose indexed name contains `query`, ignoring case, ordered by
    /// folder id. No relevance ranking. A blank query matches nothing.
    ///
    /// Hits pointing at folders that are already gone are dropped, since the
    /// index trails the folder table.
    pub async fn search(&self, query: &str) -> Result<Vec<Folder>, sqlx::Error> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let hits = self.index.query(&FieldQuery::Substring(query.to_string())).await?;
        let ids: Vec<i64> = hits
            .iter()
            .filter_map(|hit| match hit.doc_id.parse::<DocumentId>() {
                Ok(id) => Some(id.record_id()),
                Err(e) => {
                    warn!("Ignoring search hit: {}", e);
                    None
                }
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        debug!("Query {:?} hit {} folder documents", query, ids.len());

        folder::find_folders_by_ids(&self.pool, &ids).await
    }
}
