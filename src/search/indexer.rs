use super::index::{FolderDocument, FolderIndex};
use super::keys::DocumentId;
use crate::db::folder;
use crate::models::Folder;
use sqlx::SqlitePool;
use tracing::{debug, info};

/// Projects folder rows into the search index.
#[derive(Clone)]
pub struct FolderIndexer {
    pool: SqlitePool,
    index: FolderIndex,
}

impl FolderIndexer {
    pub fn new(pool: SqlitePool, index: FolderIndex) -> Self {
        Self { pool, index }
    }

    /// Writes the current state of the folder into the index. A folder that
    /// is deleted or renamed before the write lands is skipped; the task that
    /// change enqueued brings the index up to date. Returns whether a
    /// document was written.
    pub async fn upsert(&self, folder_id: i64) -> Result<bool, sqlx::Error> {
        let Some(folder) = folder::find_folder(&self.pool, folder_id).await? else {
            debug!("Folder {} no longer exists, nothing to index", folder_id);
            return Ok(false);
        };

        let written = self.index.upsert(&document_for(&folder)).await?;
        if written {
            info!("Updated the index for folder {} ({})", folder.id, folder.name);
        } else {
            debug!("Folder {} changed while indexing, skipped", folder.id);
        }

        Ok(written)
    }

    pub async fn delete(&self, folder_id: i64) -> Result<(), sqlx::Error> {
        let id = DocumentId::folder(folder_id);

        if self.index.delete(id).await? {
            info!("Removed {} from the index", id);
        } else {
            debug!("{} was not indexed", id);
        }

        Ok(())
    }

    /// Drops every folder document and indexes all folders again.
    pub async fn rebuild(&self) -> Result<usize, sqlx::Error> {
        let removed = self.index.clear().await?;
        let folders = folder::all_folders(&self.pool).await?;

        let mut indexed = 0;
        for folder in &folders {
            if self.index.upsert(&document_for(folder)).await? {
                indexed += 1;
            }
        }

        info!("Rebuilt folder index: {} removed, {} indexed", removed, indexed);
        Ok(indexed)
    }
}

fn document_for(folder: &Folder) -> FolderDocument {
    FolderDocument {
        id: DocumentId::folder(folder.id),
        folder_id: folder.id,
        name: folder.name.clone(),
    }
}
