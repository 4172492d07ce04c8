// Accounts are managed by the session layer; this is the minimum the
// foreign keys need.

use crate::models::User;
use sqlx::{Pool, Sqlite};

pub async fn create_user(pool: &Pool<Sqlite>, username: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>("INSERT INTO users (username) VALUES (?) RETURNING id, username")
        .bind(username)
        .fetch_one(pool)
        .await
}

pub async fn find_user(pool: &Pool<Sqlite>, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, username FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}
