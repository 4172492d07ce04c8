use thiserror::Error;

pub const MAX_ADDRESS_LEN: usize = 50;
pub const MAX_FOLDER_NAME_LEN: usize = 50;
pub const MAX_ALIAS_LEN: usize = 20;
pub const MAX_PAGE_LIMIT: i64 = 1000;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

fn require(value: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingParameter(field.to_string()));
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

/// Addresses are not format-checked here; the ledger API is the authority.
pub fn validate_address(address: &str) -> Result<(), ValidationError> {
    require(address, "address", MAX_ADDRESS_LEN)
}

pub fn validate_folder_name(name: &str) -> Result<(), ValidationError> {
    require(name, "folder name", MAX_FOLDER_NAME_LEN)
}

pub fn validate_alias(alias: &str) -> Result<(), ValidationError> {
    require(alias, "alias", MAX_ALIAS_LEN)
}

pub fn validate_offset(offset: Option<i64>) -> Result<i64, ValidationError> {
    match offset {
        None => Ok(0),
        Some(offset) if offset >= 0 => Ok(offset),
        Some(offset) => Err(ValidationError::InvalidParameter(format!(
            "offset must be non-negative, got {}",
            offset
        ))),
    }
}

pub fn validate_limit(limit: Option<i64>) -> Result<i64, ValidationError> {
    match limit {
        None => Ok(100),
        Some(limit) if (1..=MAX_PAGE_LIMIT).contains(&limit) => Ok(limit),
        Some(limit) => Err(ValidationError::InvalidParameter(format!(
            "limit must be between 1 and {}, got {}",
            MAX_PAGE_LIMIT, limit
        ))),
    }
}
