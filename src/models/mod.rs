// Stored records and the API views built from them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A tracked ledger account. Created once per address value, shared by every
/// user who tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Address {
    pub address: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// An address as seen by one user, with the alias that user gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TrackedAddress {
    pub address: String,
    pub alias: Option<String>,
}

/// A stored transfer. `value` is in whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub address: String,
    pub hash: String,
    pub from_account: String,
    pub to_account: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub is_public: bool,
    pub created_at: i64,
}

impl Folder {
    /// Owners see every folder of theirs; everyone else only public ones.
    pub fn is_visible_to(&self, user_id: i64) -> bool {
        self.is_public || self.user_id == user_id
    }
}

#[derive(Debug, Serialize)]
pub struct FolderView {
    #[serde(flatten)]
    pub folder: Folder,
    pub addresses: Vec<String>,
}

// API response models
#[derive(Debug, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub meta: Meta,
}

#[derive(Debug, Serialize)]
pub struct Meta {
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct SubmittedAddress {
    pub address: String,
    pub created: bool,
}
