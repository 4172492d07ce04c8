// Wire types of the ledger explorer `account/txlist` endpoint and their
// conversion into stored transactions

use crate::models::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw values are integers in minor units; whole units are 10^18 of them.
pub const MINOR_UNIT_SCALE: u32 = 18;

/// Text the ledger puts in `result` when the address is malformed.
pub const INVALID_ADDRESS_TEXT: &str = "Invalid address format";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValueError {
    #[error("value is not a non-negative integer amount of minor units: {0}")]
    NotAnInteger(String),

    #[error("value does not fit a decimal: {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub status: String,
    pub message: String,
    pub result: LedgerResult,
}

/// `result` is a transaction list on success and an error text otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerResult {
    Transactions(Vec<RawTx>),
    Text(String),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTx {
    pub hash: String,
    pub from: String,
    // empty for contract creations
    #[serde(default)]
    pub to: String,
    pub value: String,
}

impl LedgerResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "1" && self.message == "OK"
    }
}

impl LedgerResult {
    pub fn text(&self) -> Option<&str> {
        match self {
            LedgerResult::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Converts a non-negative minor-unit integer string into whole units,
/// exactly.
pub fn scale_minor_units(raw: &str) -> Result<Decimal, ValueError> {
    let digits = raw.trim();
    if digits.starts_with('-') {
        return Err(ValueError::NotAnInteger(raw.to_string()));
    }

    let minor: i128 = digits
        .parse()
        .map_err(|_| ValueError::NotAnInteger(raw.to_string()))?;

    Decimal::try_from_i128_with_scale(minor, MINOR_UNIT_SCALE)
        .map(|value| value.normalize())
        .map_err(|_| ValueError::OutOfRange(raw.to_string()))
}

impl RawTx {
    pub fn to_transaction(&self, address: &str) -> Result<Transaction, ValueError> {
        Ok(Transaction {
            address: address.to_string(),
            hash: self.hash.clone(),
            from_account: self.from.clone(),
            to_account: self.to.clone(),
            value: scale_minor_units(&self.value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scales_minor_units_to_whole_units() {
        assert_eq!(scale_minor_units("1000000000000000000").unwrap().to_string(), "1");
        assert_eq!(scale_minor_units("1").unwrap().to_string(), "0.000000000000000001");
        assert_eq!(scale_minor_units("0").unwrap().to_string(), "0");
        assert_eq!(
            scale_minor_units("123456789012345678901").unwrap().to_string(),
            "123.456789012345678901"
        );
    }

    #[test]
    fn rejects_negative_non_integer_and_oversized_values() {
        assert!(matches!(scale_minor_units("1.5"), Err(ValueError::NotAnInteger(_))));
        assert!(matches!(scale_minor_units(""), Err(ValueError::NotAnInteger(_))));
        assert!(matches!(scale_minor_units("-5"), Err(ValueError::NotAnInteger(_))));
        assert!(matches!(scale_minor_units(" -1000000000000000000"), Err(ValueError::NotAnInteger(_))));
        // 2^100 overflows the 96-bit mantissa
        assert!(matches!(
            scale_minor_units("1267650600228229401496703205376"),
            Err(ValueError::OutOfRange(_))
        ));
    }

    #[test]
    fn decodes_both_result_shapes() {
        let ok: LedgerResponse = serde_json::from_value(json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "blockNumber": "14923678",
                "hash": "0xabc",
                "from": "0x1",
                "to": "0x2",
                "value": "5",
                "gas": "21000"
            }]
        }))
        .unwrap();
        assert!(ok.is_ok());
        assert!(matches!(ok.result, LedgerResult::Transactions(ref txs) if txs.len() == 1));

        let invalid: LedgerResponse = serde_json::from_value(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Error! Invalid address format"
        }))
        .unwrap();
        assert!(!invalid.is_ok());
        assert_eq!(invalid.result.text(), Some("Error! Invalid address format"));

        let odd: LedgerResponse = serde_json::from_value(json!({
            "status": "0",
            "message": "NOTOK",
            "result": null
        }))
        .unwrap();
        assert!(matches!(odd.result, LedgerResult::Other(_)));
    }
}
