use crate::models::Transaction;
use rust_decimal::Decimal;
use sqlx::{FromRow, Pool, QueryBuilder, Sqlite};
use std::collections::HashSet;
use std::str::FromStr;

// 5 bound columns per row keeps each statement well under SQLite's
// host-parameter limit.
const INSERT_CHUNK_SIZE: usize = 100;

#[derive(FromRow)]
struct TransactionRow {
    address: String,
    hash: String,
    from_account: String,
    to_account: String,
    value: String,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = sqlx::Error;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let value = Decimal::from_str(&row.value).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Transaction {
            address: row.address,
            hash: row.hash,
            from_account: row.from_account,
            to_account: row.to_account,
            value,
        })
    }
}

/// Hashes already stored under `address`.
pub async fn existing_hashes(pool: &Pool<Sqlite>, address: &str) -> Result<HashSet<String>, sqlx::Error> {
    let hashes: Vec<String> = sqlx::query_scalar("SELECT hash FROM transactions WHERE address = ?")
        .bind(address)
        .fetch_all(pool)
        .await?;

    Ok(hashes.into_iter().collect())
}

/// Bulk insert. Rows whose `(address, hash)` is already stored are ignored,
/// so concurrent syncs of one address cannot produce duplicates. Returns the
/// number of rows actually written.
pub async fn insert_transactions(pool: &Pool<Sqlite>, transactions: &[Transaction]) -> Result<u64, sqlx::Error> {
    if transactions.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for chunk in transactions.chunks(INSERT_CHUNK_SIZE) {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "INSERT INTO transactions (address, hash, from_account, to_account, value) ",
        );
        builder.push_values(chunk, |mut row, transaction| {
            row.push_bind(transaction.address.as_str())
                .push_bind(transaction.hash.as_str())
                .push_bind(transaction.from_account.as_str())
                .push_bind(transaction.to_account.as_str())
                .push_bind(transaction.value.to_string());
        });
        builder.push(" ON CONFLICT(address, hash) DO NOTHING");

        inserted += builder.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    Ok(inserted)
}

/// One page of an address's transactions in insertion order, plus the total.
pub async fn get_transactions(
    pool: &Pool<Sqlite>,
    address: &str,
    offset: i64,
    limit: i64,
) -> Result<(Vec<Transaction>, i64), sqlx::Error> {
    let total_count = count_transactions(pool, address).await?;

    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"SELECT address, hash, from_account, to_account, value
           FROM transactions
           WHERE address = ?
           ORDER BY rowid ASC
           LIMIT ? OFFSET ?"#,
    )
    .bind(address)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let transactions = rows
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok((transactions, total_count))
}

pub async fn count_transactions(pool: &Pool<Sqlite>, address: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE address = ?")
        .bind(address)
        .fetch_one(pool)
        .await
}
