// Configuration for:
// - database connection string
// - server listening address/port
// - ledger explorer endpoint, credential and call quota
// - background worker pool sizing
// - periodic refresh interval

use dotenv::dotenv;
use std::env;
use std::time::Duration;

pub const DEFAULT_LEDGER_API_URL: &str = "https://api.etherscan.io/api";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub ledger_api_url: String,
    pub ledger_api_key: Option<String>,
    pub ledger_timeout_secs: u64,
    pub ledger_rate_limit: u32,
    pub ledger_rate_window: Duration,
    pub worker_count: usize,
    pub task_queue_capacity: usize,
    /// `None` disables the periodic refresh of stored addresses.
    pub refresh_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:data.db".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            ledger_api_url: DEFAULT_LEDGER_API_URL.to_string(),
            ledger_api_key: None,
            ledger_timeout_secs: 30,
            ledger_rate_limit: 5,
            ledger_rate_window: Duration::from_secs(1),
            worker_count: num_cpus::get(),
            task_queue_capacity: 1000,
            refresh_interval: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let server_host = env::var("SERVER_HOST").unwrap_or(defaults.server_host);
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.server_port);
        let ledger_api_url = env::var("LEDGER_API_URL").unwrap_or(defaults.ledger_api_url);
        let ledger_api_key = env::var("ETHERSCAN_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let ledger_timeout_secs = env::var("LEDGER_TIMEOUT_SECS")
            .map(|v| v.parse().unwrap_or(defaults.ledger_timeout_secs))
            .unwrap_or(defaults.ledger_timeout_secs);
        let ledger_rate_limit = env::var("LEDGER_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|calls: &u32| *calls > 0)
            .unwrap_or(defaults.ledger_rate_limit);
        let ledger_rate_window = env::var("LEDGER_RATE_WINDOW_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|ms: &u64| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.ledger_rate_window);
        let worker_count = env::var("WORKER_COUNT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|count: &usize| *count > 0)
            .unwrap_or(defaults.worker_count);
        let task_queue_capacity = env::var("TASK_QUEUE_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|capacity: &usize| *capacity > 0)
            .unwrap_or(defaults.task_queue_capacity);
        let refresh_interval = env::var("REFRESH_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            database_url,
            server_host,
            server_port,
            ledger_api_url,
            ledger_api_key,
            ledger_timeout_secs,
            ledger_rate_limit,
            ledger_rate_window,
            worker_count,
            task_queue_capacity,
            refresh_interval,
        }
    }
}
