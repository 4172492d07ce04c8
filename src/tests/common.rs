//! Shared fixtures: a fresh in-memory database per test and a local stand-in
//! for the ledger explorer API

use crate::{
    config::Config,
    db::{connection, user},
    ledger::{models::RawTx, AddressValidator, Throttle},
    state::AppState,
    tasks::{run_task, Task, TaskQueue},
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::sync::mpsc;

pub const VALID_ADDRESS: &str = "0xde0B295669a9FD93d5F28D9Ec85E40f4cb697BAe";
pub const OTHER_ADDRESS: &str = "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2";
pub const MALFORMED_ADDRESS: &str = "1234567890aaazzz";
pub const TEST_API_KEY: &str = "test-api-key";

#[derive(Default)]
struct LedgerFixture {
    payloads: HashMap<String, Value>,
    last_query: Option<HashMap<String, String>>,
}

/// Answers `GET /api?module=account&action=txlist&...` from canned payloads.
/// Unknown addresses get the ledger's invalid-format error.
#[derive(Clone)]
pub struct MockLedger {
    pub url: String,
    fixture: Arc<Mutex<LedgerFixture>>,
    calls: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct MockState {
    fixture: Arc<Mutex<LedgerFixture>>,
    calls: Arc<AtomicUsize>,
}

async fn txlist(State(state): State<MockState>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    state.calls.fetch_add(1, Ordering::SeqCst);

    let mut fixture = state.fixture.lock().unwrap();
    fixture.last_query = Some(params.clone());

    if params.get("apikey").map(String::as_str) != Some(TEST_API_KEY) {
        return Json(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Missing/Invalid API Key"
        }));
    }

    let address = params.get("address").cloned().unwrap_or_default();
    let payload = fixture.payloads.get(&address).cloned().unwrap_or_else(|| {
        json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Error! Invalid address format"
        })
    });

    Json(payload)
}

impl MockLedger {
    pub async fn start() -> Self {
        let fixture = Arc::new(Mutex::new(LedgerFixture::default()));
        let calls = Arc::new(AtomicUsize::new(0));

        let router = Router::new()
            .route("/api", get(txlist))
            .route("/broken", get(|| async { "<html>bad gateway</html>" }))
            .with_state(MockState {
                fixture: fixture.clone(),
                calls: calls.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: format!("http://{}/api", addr),
            fixture,
            calls,
        }
    }

    pub fn respond(&self, address: &str, payload: Value) {
        self.fixture
            .lock()
            .unwrap()
            .payloads
            .insert(address.to_string(), payload);
    }

    pub fn respond_ok(&self, address: &str, transactions: &[RawTx]) {
        self.respond(
            address,
            json!({
                "status": "1",
                "message": "OK",
                "result": transactions,
            }),
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.fixture.lock().unwrap().last_query.clone()
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub receiver: mpsc::Receiver<Task>,
    pub ledger: MockLedger,
}

impl TestApp {
    /// Everything enqueued so far, without running it.
    pub fn drain(&mut self) -> Vec<Task> {
        let mut tasks = Vec::new();
        while let Ok(task) = self.receiver.try_recv() {
            tasks.push(task);
        }
        tasks
    }

    /// Plays the executor: runs every queued task, in order.
    pub async fn run_pending(&mut self) {
        for task in self.drain() {
            run_task(&self.state, task).await.unwrap();
        }
    }

    pub async fn user(&self, username: &str) -> i64 {
        user::create_user(&self.state.db_pool, username).await.unwrap().id
    }
}

pub fn test_config(ledger_url: &str, api_key: Option<&str>) -> Config {
    Config {
        ledger_api_url: ledger_url.to_string(),
        ledger_api_key: api_key.map(str::to_string),
        ledger_timeout_secs: 5,
        worker_count: 2,
        task_queue_capacity: 64,
        ..Config::default()
    }
}

pub async fn setup() -> TestApp {
    setup_with_key(Some(TEST_API_KEY)).await
}

pub async fn setup_with_key(api_key: Option<&str>) -> TestApp {
    let ledger = MockLedger::start().await;
    let config = test_config(&ledger.url, api_key);
    let db_pool = connection::in_memory().await.unwrap();
    let validator = AddressValidator::with_throttle(&config, Throttle::Unlimited).unwrap();
    let (queue, receiver) = TaskQueue::channel(config.task_queue_capacity);

    TestApp {
        state: Arc::new(AppState::new(config, db_pool, validator, queue)),
        receiver,
        ledger,
    }
}

pub fn raw_tx(hash: &str, value: &str) -> RawTx {
    RawTx {
        hash: hash.to_string(),
        from: "0x00000000219ab540356cbb839cbe05303d7705fa".to_string(),
        to: VALID_ADDRESS.to_lowercase(),
        value: value.to_string(),
    }
}

/// Polls `condition` until it holds, failing the test after five seconds.
pub async fn eventually<F, Fut>(mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition().await {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached within 5s"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
