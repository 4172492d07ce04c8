use super::common::*;
use crate::api::ApiError;
use crate::db::{address, transaction};
use crate::ledger;
use crate::service;
use crate::tasks::{Task, WorkerPool};
use rust_decimal::Decimal;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn new_address_is_created_then_synced_in_the_background() {
    let mut app = setup().await;
    let user = app.user("alice").await;
    let tx = raw_tx("0xabc123", "2500000000000000000");
    app.ledger.respond_ok(VALID_ADDRESS, &[tx.clone()]);

    let submitted = service::submit_address(&app.state, user, VALID_ADDRESS).await.unwrap();

    assert!(submitted.created);
    assert!(address::find_address(&app.state.db_pool, VALID_ADDRESS).await.unwrap().is_some());
    // nothing is stored until the executor runs
    assert_eq!(transaction::count_transactions(&app.state.db_pool, VALID_ADDRESS).await.unwrap(), 0);

    let tasks = app.drain();
    assert_eq!(
        tasks,
        vec![Task::SyncTransactions {
            address: VALID_ADDRESS.to_string(),
            transactions: vec![tx.clone()],
        }]
    );
    for task in tasks {
        crate::tasks::run_task(&app.state, task).await.unwrap();
    }

    let (stored, total) = transaction::get_transactions(&app.state.db_pool, VALID_ADDRESS, 0, 10).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(stored[0].hash, tx.hash);
    assert_eq!(stored[0].from_account, tx.from);
    assert_eq!(stored[0].to_account, tx.to);
    assert_eq!(stored[0].value, Decimal::new(25, 1));
}

#[tokio::test]
async fn second_user_shares_the_address_row() {
    let mut app = setup().await;
    let alice = app.user("alice").await;
    let bob = app.user("bob").await;
    app.ledger.respond_ok(VALID_ADDRESS, &[raw_tx("0x1", "1")]);

    let first = service::submit_address(&app.state, alice, VALID_ADDRESS).await.unwrap();
    app.run_pending().await;
    let second = service::submit_address(&app.state, bob, VALID_ADDRESS).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(address::get_all_addresses(&app.state.db_pool).await.unwrap(), vec![VALID_ADDRESS]);
    assert!(address::is_tracked_by(&app.state.db_pool, bob, VALID_ADDRESS).await.unwrap());

    // the existing address is refreshed with the list just fetched
    assert!(matches!(app.drain().as_slice(), [Task::SyncTransactions { .. }]));
}

#[tokio::test]
async fn invalid_address_is_a_client_error_with_the_ledger_text() {
    let mut app = setup().await;
    let user = app.user("alice").await;

    let err = service::submit_address(&app.state, user, MALFORMED_ADDRESS).await.unwrap_err();

    assert!(matches!(err, ApiError::InvalidAddress(ref text) if text == "Error! Invalid address format"));
    assert!(address::find_address(&app.state.db_pool, MALFORMED_ADDRESS).await.unwrap().is_none());
    assert!(app.drain().is_empty());
}

#[tokio::test]
async fn other_ledger_errors_do_not_leak() {
    let app = setup().await;
    let user = app.user("alice").await;
    app.ledger.respond(
        VALID_ADDRESS,
        json!({"status": "1", "message": "NOTOK", "result": "Invalid API Key"}),
    );

    let err = service::submit_address(&app.state, user, VALID_ADDRESS).await.unwrap_err();

    assert!(matches!(err, ApiError::LedgerRejected));
    assert!(!err.to_string().contains("API Key"));
}

#[tokio::test]
async fn missing_credential_is_an_internal_error() {
    let app = setup_with_key(None).await;
    let user = app.user("alice").await;

    let err = service::submit_address(&app.state, user, VALID_ADDRESS).await.unwrap_err();

    assert!(matches!(err, ApiError::MissingCredential));
    assert_eq!(app.ledger.calls(), 0);
}

#[tokio::test]
async fn refresh_task_without_credential_exits_quietly() {
    let mut app = setup_with_key(None).await;
    address::get_or_create_address(&app.state.db_pool, VALID_ADDRESS).await.unwrap();

    app.state.notifier.address_created(VALID_ADDRESS, None).await;
    let tasks = app.drain();
    assert_eq!(
        tasks,
        vec![Task::RefreshAddress {
            address: VALID_ADDRESS.to_string()
        }]
    );

    for task in tasks {
        crate::tasks::run_task(&app.state, task).await.unwrap();
    }
    assert_eq!(transaction::count_transactions(&app.state.db_pool, VALID_ADDRESS).await.unwrap(), 0);
}

#[tokio::test]
async fn refresh_task_validates_then_syncs() {
    let mut app = setup().await;
    address::get_or_create_address(&app.state.db_pool, VALID_ADDRESS).await.unwrap();
    app.ledger.respond_ok(VALID_ADDRESS, &[raw_tx("0x1", "1"), raw_tx("0x2", "2")]);

    app.state.notifier.address_created(VALID_ADDRESS, None).await;
    app.run_pending().await;

    assert_eq!(app.ledger.calls(), 1);
    assert_eq!(transaction::count_transactions(&app.state.db_pool, VALID_ADDRESS).await.unwrap(), 2);
}

#[tokio::test]
async fn refresh_all_updates_every_address_and_survives_failures() {
    let app = setup().await;
    let pool = &app.state.db_pool;
    address::get_or_create_address(pool, VALID_ADDRESS).await.unwrap();
    address::get_or_create_address(pool, OTHER_ADDRESS).await.unwrap();
    address::get_or_create_address(pool, MALFORMED_ADDRESS).await.unwrap();
    app.ledger.respond_ok(VALID_ADDRESS, &[raw_tx("0x1", "1")]);
    app.ledger.respond_ok(OTHER_ADDRESS, &[raw_tx("0x2", "1"), raw_tx("0x3", "1")]);

    let added = ledger::refresh_all(&app.state).await.unwrap();
    assert_eq!(added, 3);
    assert_eq!(app.ledger.calls(), 3);

    // nothing new the second time round
    assert_eq!(ledger::refresh_all(&app.state).await.unwrap(), 0);
}

#[tokio::test]
async fn refresh_all_without_credential_does_nothing() {
    let app = setup_with_key(None).await;
    address::get_or_create_address(&app.state.db_pool, VALID_ADDRESS).await.unwrap();

    assert_eq!(ledger::refresh_all(&app.state).await.unwrap(), 0);
    assert_eq!(app.ledger.calls(), 0);
}

#[tokio::test]
async fn worker_pool_eventually_stores_transactions() {
    let app = setup().await;
    let user = app.user("alice").await;
    app.ledger.respond_ok(VALID_ADDRESS, &[raw_tx("0x1", "1"), raw_tx("0x2", "2")]);

    let shutdown = CancellationToken::new();
    let TestApp { state, receiver, .. } = app;
    let workers = WorkerPool::spawn(state.clone(), receiver, 2, shutdown.clone());
    assert_eq!(workers.len(), 2);

    service::submit_address(&state, user, VALID_ADDRESS).await.unwrap();

    eventually(|| {
        let pool = state.db_pool.clone();
        async move { transaction::count_transactions(&pool, VALID_ADDRESS).await.unwrap() == 2 }
    })
    .await;

    shutdown.cancel();
    workers.join().await;
}
