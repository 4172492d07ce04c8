pub mod address;
pub mod connection;
pub mod folder;
pub mod migration;
pub mod transaction;
pub mod user;

use chrono::Utc;

/// Current time as Unix seconds, the unit every timestamp column uses.
pub(crate) fn now() -> i64 {
    Utc::now().timestamp()
}

/// True when the error is a UNIQUE/PRIMARY KEY constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
