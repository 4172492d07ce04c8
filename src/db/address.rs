// Address rows and the user <-> address association (with aliases)

use crate::db::now;
use crate::models::{Address, TrackedAddress};
use sqlx::{Pool, Sqlite};

/// Inserts the address unless it already exists. The flag is `true` only for
/// the call that actually created the row.
pub async fn get_or_create_address(
    pool: &Pool<Sqlite>,
    address: &str,
) -> Result<(Address, bool), sqlx::Error> {
    let now = now();

    let created = sqlx::query(
        "INSERT INTO addresses (address, created_at, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(address) DO NOTHING",
    )
    .bind(address)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected()
        == 1;

    let row = sqlx::query_as::<_, Address>(
        "SELECT address, created_at, updated_at FROM addresses WHERE address = ?",
    )
    .bind(address)
    .fetch_one(pool)
    .await?;

    Ok((row, created))
}

pub async fn find_address(pool: &Pool<Sqlite>, address: &str) -> Result<Option<Address>, sqlx::Error> {
    sqlx::query_as::<_, Address>(
        "SELECT address, created_at, updated_at FROM addresses WHERE address = ?",
    )
    .bind(address)
    .fetch_optional(pool)
    .await
}

pub async fn touch_address(pool: &Pool<Sqlite>, address: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE addresses SET updated_at = ? WHERE address = ?")
        .bind(now())
        .bind(address)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn get_all_addresses(pool: &Pool<Sqlite>) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT address FROM addresses ORDER BY created_at, address")
        .fetch_all(pool)
        .await
}

pub async fn track_address(pool: &Pool<Sqlite>, user_id: i64, address: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO address_users (user_id, address) VALUES (?, ?)
         ON CONFLICT(user_id, address) DO NOTHING",
    )
    .bind(user_id)
    .bind(address)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn is_tracked_by(pool: &Pool<Sqlite>, user_id: i64, address: &str) -> Result<bool, sqlx::Error> {
    let result: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM address_users WHERE user_id = ? AND address = ?")
            .bind(user_id)
            .bind(address)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Sets or clears the alias. Returns `false` when the user does not track the
/// address. A taken alias surfaces as a unique violation.
pub async fn set_alias(
    pool: &Pool<Sqlite>,
    user_id: i64,
    address: &str,
    alias: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE address_users SET alias = ? WHERE user_id = ? AND address = ?")
        .bind(alias)
        .bind(user_id)
        .bind(address)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn addresses_for_user(
    pool: &Pool<Sqlite>,
    user_id: i64,
) -> Result<Vec<TrackedAddress>, sqlx::Error> {
    sqlx::query_as::<_, TrackedAddress>(
        "SELECT au.address, au.alias
         FROM address_users au
         JOIN addresses a ON a.address = au.address
         WHERE au.user_id = ?
         ORDER BY a.created_at, au.address",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
