//! User-facing operations. Each takes the requester's id as given by the
//! session layer, does its writes, then tells the notifier so background
//! work follows the committed change.

use crate::api::error::ApiError;
use crate::db::{self, address, folder, transaction, user};
use crate::ledger::AddressCheck;
use crate::models::{
    Folder, FolderView, Meta, SubmittedAddress, TrackedAddress, TransactionPage,
};
use crate::state::AppState;
use crate::validation::{
    validate_address, validate_alias, validate_folder_name, validate_limit, validate_offset,
};
use tracing::{info, warn};

async fn require_user(state: &AppState, user_id: i64) -> Result<(), ApiError> {
    match user::find_user(&state.db_pool, user_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Unauthorized),
    }
}

async fn require_tracked(state: &AppState, user_id: i64, addr: &str) -> Result<(), ApiError> {
    if address::is_tracked_by(&state.db_pool, user_id, addr).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("address {} is not tracked", addr)))
    }
}

/// Folders are only reachable through their owner; anyone else gets
/// NotFound, not Forbidden.
async fn owned_folder(state: &AppState, user_id: i64, folder_id: i64) -> Result<Folder, ApiError> {
    match folder::find_folder(&state.db_pool, folder_id).await? {
        Some(folder) if folder.user_id == user_id => Ok(folder),
        _ => Err(ApiError::NotFound(format!("folder {}", folder_id))),
    }
}

/// Checks `addr` against the ledger and starts tracking it for the user.
/// Returns before any transaction is stored.
pub async fn submit_address(
    state: &AppState,
    user_id: i64,
    addr: &str,
) -> Result<SubmittedAddress, ApiError> {
    let addr = addr.trim();
    validate_address(addr)?;
    require_user(state, user_id).await?;

    let transactions = match state.validator.validate(addr).await?.check() {
        AddressCheck::Valid(transactions) => transactions,
        AddressCheck::MissingCredential => {
            warn!("Please provide the ledger API token");
            return Err(ApiError::MissingCredential);
        }
        AddressCheck::InvalidAddress(text) => return Err(ApiError::InvalidAddress(text)),
        AddressCheck::ApiError { status, message } => {
            warn!("Ledger refused {}: status={}, message={}", addr, status, message);
            return Err(ApiError::LedgerRejected);
        }
    };

    let (record, created) = address::get_or_create_address(&state.db_pool, addr).await?;
    address::track_address(&state.db_pool, user_id, &record.address).await?;

    info!(
        "User {} tracks {} ({} transactions listed, new address: {})",
        user_id,
        record.address,
        transactions.len(),
        created
    );

    if created {
        state
            .notifier
            .address_created(&record.address, Some(transactions))
            .await;
    } else {
        state
            .notifier
            .transactions_fetched(&record.address, transactions)
            .await;
    }

    Ok(SubmittedAddress {
        address: record.address,
        created,
    })
}

pub async fn tracked_addresses(state: &AppState, user_id: i64) -> Result<Vec<TrackedAddress>, ApiError> {
    Ok(address::addresses_for_user(&state.db_pool, user_id).await?)
}

pub async fn address_transactions(
    state: &AppState,
    addr: &str,
    offset: Option<i64>,
    limit: Option<i64>,
) -> Result<TransactionPage, ApiError> {
    let offset = validate_offset(offset)?;
    let limit = validate_limit(limit)?;

    if address::find_address(&state.db_pool, addr).await?.is_none() {
        return Err(ApiError::NotFound(format!("address {}", addr)));
    }

    let (transactions, total) = transaction::get_transactions(&state.db_pool, addr, offset, limit).await?;

    Ok(TransactionPage {
        transactions,
        meta: Meta { total, offset, limit },
    })
}

/// Sets, replaces or (with `None`) clears the user's alias for `addr`.
pub async fn set_alias(
    state: &AppState,
    user_id: i64,
    addr: &str,
    alias: Option<&str>,
) -> Result<TrackedAddress, ApiError> {
    let alias = alias.map(str::trim);
    if let Some(alias) = alias {
        validate_alias(alias)?;
    }

    match address::set_alias(&state.db_pool, user_id, addr, alias).await {
        Ok(true) => Ok(TrackedAddress {
            address: addr.to_string(),
            alias: alias.map(str::to_string),
        }),
        Ok(false) => Err(ApiError::NotFound(format!("address {} is not tracked", addr))),
        Err(e) if db::is_unique_violation(&e) => Err(ApiError::Conflict(format!(
            "alias {} is already taken",
            alias.unwrap_or_default()
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_folders(state: &AppState, user_id: i64) -> Result<Vec<Folder>, ApiError> {
    Ok(folder::folders_for_user(&state.db_pool, user_id).await?)
}

/// Creates a folder, optionally holding one of the user's addresses.
pub async fn create_folder(
    state: &AppState,
    user_id: i64,
    name: &str,
    is_public: bool,
    addr: Option<&str>,
) -> Result<Folder, ApiError> {
    let name = name.trim();
    validate_folder_name(name)?;
    require_user(state, user_id).await?;

    if let Some(addr) = addr {
        require_tracked(state, user_id, addr).await?;
    }

    let created = folder::create_folder(&state.db_pool, user_id, name, is_public).await?;
    if let Some(addr) = addr {
        folder::add_address_to_folder(&state.db_pool, created.id, addr).await?;
    }

    info!("User {} created folder {} ({})", user_id, created.id, created.name);
    state.notifier.folder_created(created.id).await;

    Ok(created)
}

pub async fn rename_folder(
    state: &AppState,
    user_id: i64,
    folder_id: i64,
    name: &str,
) -> Result<Folder, ApiError> {
    let name = name.trim();
    validate_folder_name(name)?;
    let mut existing = owned_folder(state, user_id, folder_id).await?;

    if !folder::rename_folder(&state.db_pool, folder_id, name).await? {
        return Err(ApiError::NotFound(format!("folder {}", folder_id)));
    }
    state.notifier.folder_renamed(folder_id).await;

    existing.name = name.to_string();
    Ok(existing)
}

pub async fn set_folder_visibility(
    state: &AppState,
    user_id: i64,
    folder_id: i64,
    is_public: bool,
) -> Result<Folder, ApiError> {
    let mut existing = owned_folder(state, user_id, folder_id).await?;

    if !folder::set_folder_visibility(&state.db_pool, folder_id, is_public).await? {
        return Err(ApiError::NotFound(format!("folder {}", folder_id)));
    }

    existing.is_public = is_public;
    Ok(existing)
}

pub async fn delete_folder(state: &AppState, user_id: i64, folder_id: i64) -> Result<(), ApiError> {
    owned_folder(state, user_id, folder_id).await?;

    folder::delete_folder(&state.db_pool, folder_id).await?;
    info!("User {} deleted folder {}", user_id, folder_id);
    state.notifier.folder_deleted(folder_id).await;

    Ok(())
}

pub async fn save_address_to_folder(
    state: &AppState,
    user_id: i64,
    folder_id: i64,
    addr: &str,
) -> Result<FolderView, ApiError> {
    let existing = owned_folder(state, user_id, folder_id).await?;
    require_tracked(state, user_id, addr).await?;

    folder::add_address_to_folder(&state.db_pool, folder_id, addr).await?;

    let addresses = folder::addresses_in_folder(&state.db_pool, folder_id).await?;
    Ok(FolderView {
        folder: existing,
        addresses,
    })
}

pub async fn folder_details(state: &AppState, user_id: i64, folder_id: i64) -> Result<FolderView, ApiError> {
    let found = folder::find_folder(&state.db_pool, folder_id)
        .await?
        .filter(|f| f.is_visible_to(user_id))
        .ok_or_else(|| ApiError::NotFound(format!("folder {}", folder_id)))?;

    let addresses = folder::addresses_in_folder(&state.db_pool, folder_id).await?;
    Ok(FolderView {
        folder: found,
        addresses,
    })
}

/// Folder search limited to what the requester may see.
pub async fn search_folders(state: &AppState, user_id: i64, query: &str) -> Result<Vec<Folder>, ApiError> {
    let folders = state.searcher.search(query).await?;

    Ok(folders
        .into_iter()
        .filter(|f| f.is_visible_to(user_id))
        .collect())
}
