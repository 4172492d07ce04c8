use crate::db::now;
use crate::models::Folder;
use sqlx::{Pool, QueryBuilder, Sqlite};

const FOLDER_COLUMNS: &str = "id, user_id, name, is_public, created_at";

pub async fn create_folder(
    pool: &Pool<Sqlite>,
    user_id: i64,
    name: &str,
    is_public: bool,
) -> Result<Folder, sqlx::Error> {
    sqlx::query_as::<_, Folder>(&format!(
        "INSERT INTO folders (user_id, name, is_public, created_at) VALUES (?, ?, ?, ?)
         RETURNING {}",
        FOLDER_COLUMNS
    ))
    .bind(user_id)
    .bind(name)
    .bind(is_public)
    .bind(now())
    .fetch_one(pool)
    .await
}

pub async fn find_folder(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Folder>, sqlx::Error> {
    sqlx::query_as::<_, Folder>(&format!("SELECT {} FROM folders WHERE id = ?", FOLDER_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn folders_for_user(pool: &Pool<Sqlite>, user_id: i64) -> Result<Vec<Folder>, sqlx::Error> {
    sqlx::query_as::<_, Folder>(&format!(
        "SELECT {} FROM folders WHERE user_id = ? ORDER BY id",
        FOLDER_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn all_folders(pool: &Pool<Sqlite>) -> Result<Vec<Folder>, sqlx::Error> {
    sqlx::query_as::<_, Folder>(&format!("SELECT {} FROM folders ORDER BY id", FOLDER_COLUMNS))
        .fetch_all(pool)
        .await
}

/// Folders whose id is in `ids`, ordered by id. Unknown ids are skipped.
pub async fn find_folders_by_ids(pool: &Pool<Sqlite>, ids: &[i64]) -> Result<Vec<Folder>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM folders WHERE id IN (", FOLDER_COLUMNS));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY id");

    builder.build_query_as::<Folder>().fetch_all(pool).await
}

pub async fn rename_folder(pool: &Pool<Sqlite>, id: i64, name: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE folders SET name = ? WHERE id = ?")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_folder_visibility(pool: &Pool<Sqlite>, id: i64, is_public: bool) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE folders SET is_public = ? WHERE id = ?")
        .bind(is_public)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_folder(pool: &Pool<Sqlite>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM folders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn add_address_to_folder(pool: &Pool<Sqlite>, folder_id: i64, address: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO folder_addresses (folder_id, address) VALUES (?, ?)
         ON CONFLICT(folder_id, address) DO NOTHING",
    )
    .bind(folder_id)
    .bind(address)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn addresses_in_folder(pool: &Pool<Sqlite>, folder_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT address FROM folder_addresses WHERE folder_id = ? ORDER BY rowid")
        .bind(folder_id)
        .fetch_all(pool)
        .await
}
