//! Document store backing folder search, kept in its own table and fed only
//! through the background queue

use super::keys::DocumentId;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDocument {
    pub id: DocumentId,
    pub folder_id: i64,
    pub name: String,
}

/// Match modes on the `name` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldQuery {
    /// Case-insensitive substring, the equivalent of `*text*`.
    Substring(String),
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SearchHit {
    pub doc_id: String,
}

#[derive(Clone)]
pub struct FolderIndex {
    pool: SqlitePool,
}

impl FolderIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates or overwrites the document, provided its folder still exists
    /// under the same name. Check and write are one statement, so a folder
    /// deleted or renamed concurrently never leaves a stale document.
    /// Returns whether the document was written.
    pub async fn upsert(&self, document: &FolderDocument) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO folder_documents (doc_id, folder_id, name, name_folded)
             SELECT ?, id, name, ? FROM folders WHERE id = ? AND name = ?
             ON CONFLICT(doc_id) DO UPDATE SET
                 folder_id = excluded.folder_id,
                 name = excluded.name,
                 name_folded = excluded.name_folded",
        )
        .bind(document.id.to_string())
        .bind(document.name.to_lowercase())
        .bind(document.folder_id)
        .bind(&document.name)
        .execute(&self.pool)
        .await?;

        let written = result.rows_affected() > 0;
        if written {
            debug!("Indexed {} as {:?}", document.id, document.name);
        }
        Ok(written)
    }

    /// Removes the document; a missing one is not an error. Returns whether
    /// anything was removed.
    pub async fn delete(&self, id: DocumentId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM folder_documents WHERE doc_id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get(&self, id: DocumentId) -> Result<Option<FolderDocument>, sqlx::Error> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT folder_id, name FROM folder_documents WHERE doc_id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(folder_id, name)| FolderDocument { id, folder_id, name }))
    }

    /// Hits in document insertion order.
    pub async fn query(&self, query: &FieldQuery) -> Result<Vec<SearchHit>, sqlx::Error> {
        let (sql, value) = match query {
            FieldQuery::Substring(text) => (
                "SELECT doc_id FROM folder_documents
                 WHERE name_folded LIKE ? ESCAPE '\\' ORDER BY rowid",
                format!("%{}%", escape_like(&text.to_lowercase())),
            ),
            FieldQuery::Exact(text) => (
                "SELECT doc_id FROM folder_documents
                 WHERE name = ? ORDER BY rowid",
                text.clone(),
            ),
        };

        sqlx::query_as::<_, SearchHit>(sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await
    }

    /// Drops every document. Used before a full rebuild.
    pub async fn clear(&self) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM folder_documents").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
