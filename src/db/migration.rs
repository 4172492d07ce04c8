use sqlx::SqlitePool;
use tracing::info;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE
    )",
    "CREATE TABLE IF NOT EXISTS addresses (
        address TEXT PRIMARY KEY,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS address_users (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        address TEXT NOT NULL REFERENCES addresses(address) ON DELETE CASCADE,
        alias TEXT UNIQUE,
        PRIMARY KEY (user_id, address)
    )",
    // value is exact decimal text in whole units
    "CREATE TABLE IF NOT EXISTS transactions (
        address TEXT NOT NULL REFERENCES addresses(address) ON DELETE CASCADE,
        hash TEXT NOT NULL,
        from_account TEXT NOT NULL,
        to_account TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (address, hash)
    )",
    "CREATE TABLE IF NOT EXISTS folders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        is_public BOOLEAN NOT NULL DEFAULT 0,
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS folder_addresses (
        folder_id INTEGER NOT NULL REFERENCES folders(id) ON DELETE CASCADE,
        address TEXT NOT NULL REFERENCES addresses(address) ON DELETE CASCADE,
        PRIMARY KEY (folder_id, address)
    )",
    // Search documents mirror folders asynchronously, so no foreign key here.
    // name_folded is the Unicode lowercase of name; SQLite only folds ASCII.
    "CREATE TABLE IF NOT EXISTS folder_documents (
        doc_id TEXT PRIMARY KEY,
        folder_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        name_folded TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_folders_user ON folders(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_address_users_address ON address_users(address)",
];

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("Running database migrations...");

    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}
