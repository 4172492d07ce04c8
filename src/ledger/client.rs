use crate::config::Config;
use crate::ledger::models::{LedgerResponse, LedgerResult, RawTx, INVALID_ADDRESS_TEXT};
use crate::ledger::rate_limit::Throttle;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed ledger response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of one validation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// No credential is configured, so the ledger was never called. This is
    /// not a verdict on the address.
    MissingCredential,
    Checked { ok: bool, payload: LedgerResponse },
}

/// What a caller should do with an address after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressCheck {
    MissingCredential,
    Valid(Vec<RawTx>),
    /// The ledger rejected the address format; carries its text verbatim.
    InvalidAddress(String),
    /// Throttling, bad key and similar. Not safe to show to end users.
    ApiError { status: String, message: String },
}

impl Validation {
    pub fn check(self) -> AddressCheck {
        match self {
            Validation::MissingCredential => AddressCheck::MissingCredential,
            Validation::Checked { ok: true, payload } => match payload.result {
                LedgerResult::Transactions(transactions) => AddressCheck::Valid(transactions),
                _ => AddressCheck::ApiError {
                    status: payload.status,
                    message: payload.message,
                },
            },
            Validation::Checked { ok: false, payload } => match payload.result {
                LedgerResult::Text(text) if text.contains(INVALID_ADDRESS_TEXT) => {
                    AddressCheck::InvalidAddress(text)
                }
                _ => AddressCheck::ApiError {
                    status: payload.status,
                    message: payload.message,
                },
            },
        }
    }
}

/// Asks the ledger explorer for an address's full transaction list. All
/// clones share the same HTTP client and call quota.
#[derive(Clone)]
pub struct AddressValidator {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    throttle: Throttle,
}

impl AddressValidator {
    pub fn new(config: &Config) -> Result<Self, LedgerError> {
        let throttle = Throttle::per_window(config.ledger_rate_limit, config.ledger_rate_window);
        Self::with_throttle(config, throttle)
    }

    pub fn with_throttle(config: &Config, throttle: Throttle) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ledger_timeout_secs))
            .build()?;

        info!(
            "Initializing ledger client with endpoint: {}, credential configured: {}",
            config.ledger_api_url,
            config.ledger_api_key.is_some()
        );

        Ok(Self {
            http,
            api_url: config.ledger_api_url.clone(),
            api_key: config.ledger_api_key.clone(),
            throttle,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// One outbound request for every transaction of `address`, oldest first.
    ///
    /// Any JSON body is returned as the payload whatever the HTTP status, so
    /// callers can tell a rejected address from other API failures. Only
    /// transport failures and non-JSON bodies are errors.
    pub async fn validate(&self, address: &str) -> Result<Validation, LedgerError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Ledger API credential is not configured, skipping {}", address);
            return Ok(Validation::MissingCredential);
        };

        self.throttle.acquire().await;

        debug!("Fetching transaction list for {}", address);

        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "asc"),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        let http_status = response.status();
        let body = response.bytes().await?;
        let payload: LedgerResponse = serde_json::from_slice(&body)?;
        let ok = payload.is_ok();

        debug!(
            "Ledger answered {} for {}: status={}, message={}",
            http_status, address, payload.status, payload.message
        );

        Ok(Validation::Checked { ok, payload })
    }
}
